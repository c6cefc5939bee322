//! Tracing and metrics bootstrap for embedding applications.

use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static COUNTER_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// Call once at startup; a second call fails because the global subscriber
/// slot is already taken.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_counters();

    let filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default())
        .with(format_layer(logging.format))
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn format_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    }
}

fn describe_counters() {
    COUNTER_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "veduta_persist_failure_total",
            Unit::Count,
            "Durable writes that failed after the in-memory mutation committed."
        );
        describe_counter!(
            "veduta_content_update_rejected_total",
            Unit::Count,
            "Path-addressed content updates dropped because the path or value shape did not resolve."
        );
        describe_counter!(
            "veduta_email_attempt_total",
            Unit::Count,
            "Notification and test email dispatch attempts."
        );
        describe_counter!(
            "veduta_email_failure_total",
            Unit::Count,
            "Email dispatch attempts that ended in a configuration or transient failure."
        );
    });
}
