//! Simulated notification transport.
//!
//! There is no real SMTP client behind this module: dispatch validates the
//! configured settings, waits out a fixed cooperative delay, and then draws
//! against the configured failure rate. The contract a real transport would
//! have to preserve is the interface here: settings-gated, boolean outcome,
//! one audit entry per attempt, never an error to the caller, no automatic
//! retry.

use metrics::counter;
use rand::Rng;
use tokio::time::sleep;
use tracing::debug;

use crate::config::MailerSettings;
use crate::domain::content::EmailSettings;
use crate::domain::types::EmailStatus;

const ERR_NOT_CONFIGURED: &str = "Email settings not configured properly";
const ERR_INVALID_SMTP: &str = "Invalid SMTP configuration";
const ERR_TRANSIENT: &str = "SMTP server temporarily unavailable";

/// Outcome of one dispatch attempt. The engine turns this into an
/// [`crate::domain::entities::EmailLogRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub status: EmailStatus,
    pub error: Option<String>,
}

impl DispatchOutcome {
    pub fn delivered(&self) -> bool {
        self.status == EmailStatus::Success
    }

    fn failed(error: &str) -> Self {
        Self {
            status: EmailStatus::Failed,
            error: Some(error.to_string()),
        }
    }
}

/// The simulated transport. Cheap to clone; holds only configuration.
#[derive(Debug, Clone)]
pub struct NotificationMailer {
    settings: MailerSettings,
}

impl NotificationMailer {
    pub fn new(settings: MailerSettings) -> Self {
        Self { settings }
    }

    /// Attempt to deliver one message under the currently configured SMTP
    /// settings.
    ///
    /// Disabled notifications and incomplete credentials fail immediately,
    /// before the simulated round trip. Everything else waits out the
    /// configured delay and succeeds unless the failure draw hits.
    pub async fn dispatch(
        &self,
        email: &EmailSettings,
        to: &str,
        subject: &str,
        _body: &str,
    ) -> DispatchOutcome {
        counter!("veduta_email_attempt_total").increment(1);

        if !email.enabled
            || email.smtp_user.trim().is_empty()
            || email.smtp_password.trim().is_empty()
        {
            debug!(to, subject, "email dispatch rejected: notifications disabled or credentials missing");
            counter!("veduta_email_failure_total").increment(1);
            return DispatchOutcome::failed(ERR_NOT_CONFIGURED);
        }

        if email.smtp_host.trim().is_empty() || email.to_email.trim().is_empty() {
            debug!(to, subject, "email dispatch rejected: incomplete SMTP settings");
            counter!("veduta_email_failure_total").increment(1);
            return DispatchOutcome::failed(ERR_INVALID_SMTP);
        }

        // Simulated network round trip.
        sleep(self.settings.dispatch_delay).await;

        if rand::rng().random::<f64>() < self.settings.failure_rate {
            debug!(to, subject, "email dispatch failed the transient draw");
            counter!("veduta_email_failure_total").increment(1);
            return DispatchOutcome::failed(ERR_TRANSIENT);
        }

        debug!(to, subject, "email dispatched");
        DispatchOutcome {
            status: EmailStatus::Success,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn mailer(failure_rate: f64) -> NotificationMailer {
        NotificationMailer::new(MailerSettings {
            dispatch_delay: Duration::ZERO,
            failure_rate,
        })
    }

    fn configured_settings() -> EmailSettings {
        EmailSettings {
            smtp_host: "smtp.gmail.com".into(),
            smtp_port: 587,
            smtp_user: "studio".into(),
            smtp_password: "secret".into(),
            from_email: "noreply@photography.co.il".into(),
            to_email: "admin@photography.co.il".into(),
            enabled: true,
        }
    }

    #[tokio::test]
    async fn disabled_notifications_fail_with_a_configuration_error() {
        let mut settings = configured_settings();
        settings.enabled = false;

        let outcome = mailer(0.0)
            .dispatch(&settings, "admin@photography.co.il", "Test", "body")
            .await;
        assert!(!outcome.delivered());
        assert_eq!(outcome.error.as_deref(), Some(ERR_NOT_CONFIGURED));
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_the_round_trip() {
        let mut settings = configured_settings();
        settings.smtp_password.clear();

        let slow = NotificationMailer::new(MailerSettings {
            dispatch_delay: Duration::from_secs(30),
            failure_rate: 0.0,
        });
        // Finishing at all proves the configuration check short-circuits the
        // simulated delay.
        let outcome = tokio::time::timeout(
            Duration::from_millis(200),
            slow.dispatch(&settings, "admin@photography.co.il", "Test", "body"),
        )
        .await
        .expect("configuration failures must not wait out the delay");
        assert_eq!(outcome.error.as_deref(), Some(ERR_NOT_CONFIGURED));
    }

    #[tokio::test]
    async fn blank_host_counts_as_invalid_smtp() {
        let mut settings = configured_settings();
        settings.smtp_host = "  ".into();

        let outcome = mailer(0.0)
            .dispatch(&settings, "admin@photography.co.il", "Test", "body")
            .await;
        assert_eq!(outcome.error.as_deref(), Some(ERR_INVALID_SMTP));
    }

    #[tokio::test]
    async fn zero_failure_rate_always_delivers() {
        let outcome = mailer(0.0)
            .dispatch(&configured_settings(), "admin@photography.co.il", "Test", "body")
            .await;
        assert!(outcome.delivered());
        assert_eq!(outcome.error, None);
    }

    #[tokio::test]
    async fn unit_failure_rate_always_fails_transiently() {
        let outcome = mailer(1.0)
            .dispatch(&configured_settings(), "admin@photography.co.il", "Test", "body")
            .await;
        assert!(!outcome.delivered());
        assert_eq!(outcome.error.as_deref(), Some(ERR_TRANSIENT));
    }
}
