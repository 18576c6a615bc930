use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::eligibility::EligibilityConfig;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Log filter used when RUST_LOG is unset (default: "warn")
    #[serde(default)]
    pub log_level: Option<String>,

    /// Thresholds and weights for the eligibility engine
    #[serde(default)]
    pub eligibility: Option<EligibilityConfig>,

    /// Text-generation service used for advice and education
    #[serde(default)]
    pub advice: Option<AdviceConfig>,
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("warn")
    }
}

/// Advice service settings.
///
/// Example YAML:
/// ```yaml
/// advice:
///   enabled: true
///   model: gemini-2.0-flash
///   timeout: 30s
///   retries: 3
///   cache_ttl: 24h
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AdviceConfig {
    pub enabled: bool,
    pub model: String,
    pub endpoint: String,
    /// Per-request timeout, humantime format ("30s", "1m")
    pub timeout: String,
    /// Attempts after the first one for transient failures
    pub retries: usize,
    /// How long cached educational content stays fresh ("24h")
    pub cache_ttl: String,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: "30s".to_string(),
            retries: 3,
            cache_ttl: "24h".to_string(),
        }
    }
}

impl AdviceConfig {
    pub fn timeout(&self) -> Result<Duration, humantime::DurationError> {
        humantime::parse_duration(self.timeout.trim())
    }

    pub fn cache_ttl(&self) -> Result<Duration, humantime::DurationError> {
        humantime::parse_duration(self.cache_ttl.trim())
    }

    /// Returns every problem found (empty when valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.model.trim().is_empty() {
            errors.push("advice.model: must not be empty".to_string());
        }
        if !self.endpoint.starts_with("https://") && !self.endpoint.starts_with("http://") {
            errors.push(format!(
                "advice.endpoint: must be an http(s) URL, got '{}'",
                self.endpoint
            ));
        }
        match self.timeout() {
            Ok(d) if d.is_zero() => errors.push("advice.timeout: must be greater than zero".to_string()),
            Ok(_) => {}
            Err(e) => errors.push(format!("advice.timeout: invalid '{}' - {}", self.timeout, e)),
        }
        if let Err(e) = self.cache_ttl() {
            errors.push(format!("advice.cache_ttl: invalid '{}' - {}", self.cache_ttl, e));
        }

        errors
    }
}
