use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter { value: String, source: ParseError },
    #[error("telemetry error: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Pick the filter directive: `RUST_LOG` first, then `--verbose`, then the
/// configured level.
fn filter_directive(rust_log: Option<String>, configured: &str, verbose: bool) -> String {
    match rust_log {
        Some(value) if !value.trim().is_empty() => value,
        _ if verbose => "debug".to_string(),
        _ => configured.to_string(),
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for results and `--json`.
pub fn init(configured_level: &str, verbose: bool) -> Result<(), TelemetryError> {
    let directive = filter_directive(
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        configured_level,
        verbose,
    );
    let env_filter = EnvFilter::try_new(&directive).map_err(|source| TelemetryError::EnvFilter {
        value: directive.clone(),
        source,
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_wins() {
        assert_eq!(
            filter_directive(Some("loan_check=trace".to_string()), "warn", true),
            "loan_check=trace"
        );
    }

    #[test]
    fn test_verbose_beats_config() {
        assert_eq!(filter_directive(None, "warn", true), "debug");
        assert_eq!(filter_directive(Some("  ".to_string()), "warn", true), "debug");
    }

    #[test]
    fn test_configured_level() {
        assert_eq!(filter_directive(None, "info", false), "info");
    }

    #[test]
    fn test_bad_directive_is_reported() {
        let err = EnvFilter::try_new("loan_check=notalevel").unwrap_err();
        let err = TelemetryError::EnvFilter {
            value: "loan_check=notalevel".to_string(),
            source: err,
        };
        assert!(err.to_string().contains("loan_check=notalevel"));
    }
}
