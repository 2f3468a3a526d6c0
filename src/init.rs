use crate::env::{env_flag, env_or, CW_OTLP_LOG_FILTER_ENV, CW_OTLP_LOG_JSON_ENV};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Configuration of the process-wide diagnostic output.
///
/// **Fields**
/// - `default_filter`: directive used when `RUST_LOG` is not set.
/// - `json`: if `true`, events are written as JSON lines instead of the
///   human-readable `fmt` format.
#[derive(Clone, Debug)]
pub struct LogConfig {
    pub default_filter: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Build a config from `CW_OTLP_LOG_FILTER` and `CW_OTLP_LOG_JSON`.
    pub fn from_env() -> Self {
        Self {
            default_filter: env_or(CW_OTLP_LOG_FILTER_ENV, "info"),
            json: env_flag(CW_OTLP_LOG_JSON_ENV),
        }
    }

    fn filter(&self) -> Result<EnvFilter, InitError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => Ok(EnvFilter::try_new(&self.default_filter)?),
        }
    }
}

/// Error type returned when the global subscriber cannot be installed.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("invalid log filter directive: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("failed to install global subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Install a global `tracing` subscriber using the provided [`LogConfig`].
///
/// **Effects**
///
/// This installs a [`Registry`] with an [`EnvFilter`] and a `fmt` layer as
/// the global default subscriber. `RUST_LOG` takes precedence over
/// `config.default_filter`.
///
/// **Returns**
/// - `Err(InitError::Subscriber)` if a global subscriber was already set.
pub fn init_logging_with_config(config: &LogConfig) -> Result<(), InitError> {
    let filter = config.filter()?;

    // The two fmt layers have different types, so the subscriber is
    // assembled in two variants.
    if config.json {
        Registry::default()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()?;
    } else {
        Registry::default()
            .with(filter)
            .with(fmt::layer())
            .try_init()?;
    }
    Ok(())
}

/// Initialize logging from the environment.
///
/// Equivalent to calling [`init_logging_with_config`] with
/// [`LogConfig::from_env`].
pub fn init_logging() -> Result<(), InitError> {
    init_logging_with_config(&LogConfig::from_env())
}
