//! Configuration layer: typed settings with layered precedence (file → env).
//!
//! The crate has no executable surface, so there is no CLI layer; embedders
//! either call [`load`] to pick up `veduta.toml` and `VEDUTA__*` environment
//! overrides, or construct [`Settings`] directly.

use std::{path::PathBuf, str::FromStr, time::Duration};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const LOCAL_CONFIG_BASENAME: &str = "veduta";
const ENV_PREFIX: &str = "VEDUTA";
const DEFAULT_STORAGE_DIR: &str = "data";
const DEFAULT_DISPATCH_DELAY_MS: u64 = 1500;
const DEFAULT_FAILURE_RATE: f64 = 0.05;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
    pub mailer: MailerSettings,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub directory: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Knobs for the simulated notification transport. The defaults reproduce
/// the observed behaviour (1.5 s round trip, 5% transient failure); tests
/// pin both to deterministic values.
#[derive(Debug, Clone)]
pub struct MailerSettings {
    pub dispatch_delay: Duration,
    pub failure_rate: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage: StorageSettings {
                directory: PathBuf::from(DEFAULT_STORAGE_DIR),
            },
            logging: LoggingSettings {
                level: LevelFilter::INFO,
                format: LogFormat::Compact,
            },
            mailer: MailerSettings {
                dispatch_delay: Duration::from_millis(DEFAULT_DISPATCH_DELAY_MS),
                failure_rate: DEFAULT_FAILURE_RATE,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (optional file → environment).
pub fn load(config_file: Option<&std::path::Path>) -> Result<Settings, LoadError> {
    let mut builder =
        Config::builder().add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let raw: RawSettings = builder.build()?.try_deserialize()?;
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    storage: RawStorageSettings,
    logging: RawLoggingSettings,
    mailer: RawMailerSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawStorageSettings {
    directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawMailerSettings {
    dispatch_delay_ms: Option<u64>,
    failure_rate: Option<f64>,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            storage,
            logging,
            mailer,
        } = raw;

        Ok(Self {
            storage: build_storage_settings(storage)?,
            logging: build_logging_settings(logging)?,
            mailer: build_mailer_settings(mailer)?,
        })
    }
}

fn build_storage_settings(storage: RawStorageSettings) -> Result<StorageSettings, LoadError> {
    let directory = storage
        .directory
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));
    if directory.as_os_str().is_empty() {
        return Err(LoadError::invalid(
            "storage.directory",
            "path must not be empty",
        ));
    }
    Ok(StorageSettings { directory })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_mailer_settings(mailer: RawMailerSettings) -> Result<MailerSettings, LoadError> {
    let delay_ms = mailer
        .dispatch_delay_ms
        .unwrap_or(DEFAULT_DISPATCH_DELAY_MS);

    let failure_rate = mailer.failure_rate.unwrap_or(DEFAULT_FAILURE_RATE);
    if !(0.0..=1.0).contains(&failure_rate) {
        return Err(LoadError::invalid(
            "mailer.failure_rate",
            "must be between 0.0 and 1.0",
        ));
    }

    Ok(MailerSettings {
        dispatch_delay: Duration::from_millis(delay_ms),
        failure_rate,
    })
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn defaults_reproduce_the_observed_behaviour() {
        let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
        assert_eq!(settings.storage.directory, PathBuf::from("data"));
        assert_eq!(settings.mailer.dispatch_delay, Duration::from_millis(1500));
        assert!((settings.mailer.failure_rate - 0.05).abs() < f64::EPSILON);
        assert_eq!(settings.logging.level, LevelFilter::INFO);
        assert!(matches!(settings.logging.format, LogFormat::Compact));
    }

    #[test]
    fn failure_rate_outside_unit_interval_is_rejected() {
        let raw = RawSettings {
            mailer: RawMailerSettings {
                failure_rate: Some(1.5),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = Settings::from_raw(raw).expect_err("rate must be rejected");
        assert!(matches!(
            err,
            LoadError::Invalid {
                key: "mailer.failure_rate",
                ..
            }
        ));
    }

    #[test]
    fn empty_storage_directory_is_rejected() {
        let raw = RawSettings {
            storage: RawStorageSettings {
                directory: Some(PathBuf::new()),
            },
            ..Default::default()
        };
        assert!(Settings::from_raw(raw).is_err());
    }

    #[test]
    #[serial]
    fn environment_overrides_take_precedence() {
        // SAFETY: the test is serialised, so no other thread touches the
        // environment concurrently.
        unsafe {
            std::env::set_var("VEDUTA__STORAGE__DIRECTORY", "/tmp/veduta-test");
            std::env::set_var("VEDUTA__LOGGING__LEVEL", "debug");
        }

        let settings = load(None).expect("valid settings");
        assert_eq!(settings.storage.directory, PathBuf::from("/tmp/veduta-test"));
        assert_eq!(settings.logging.level, LevelFilter::DEBUG);

        unsafe {
            std::env::remove_var("VEDUTA__STORAGE__DIRECTORY");
            std::env::remove_var("VEDUTA__LOGGING__LEVEL");
        }
    }
}
