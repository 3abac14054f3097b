use std::{error::Error, fmt};

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "FINPLAN_LOG";

/// Level used when neither `--log-level` nor `FINPLAN_LOG` is set.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    /// Explicit directive from the command line; wins over the environment.
    pub log_level: Option<String>,
}

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "invalid log filter '{}'", value)
            }
            TelemetryError::Subscriber(err) => {
                write!(f, "failed to initialise tracing subscriber: {}", err)
            }
        }
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(err.as_ref()),
        }
    }
}

/// Install a compact stderr subscriber. Stdout stays reserved for command
/// output.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Some(level) = &config.log_level {
        return parse_filter(level);
    }
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => parse_filter(DEFAULT_LOG_LEVEL),
    }
}

fn parse_filter(value: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(value).map_err(|source| TelemetryError::EnvFilter {
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_level_is_parsed() {
        let config = TelemetryConfig {
            log_level: Some("finplan_core=debug".into()),
        };
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn test_bad_directive_is_reported() {
        let config = TelemetryConfig {
            log_level: Some("finplan_core=notalevel".into()),
        };
        let err = build_filter(&config).unwrap_err();
        assert_eq!(err.to_string(), "invalid log filter 'finplan_core=notalevel'");
    }
}
