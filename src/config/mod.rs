pub mod init;
mod schema;

pub use schema::{AdviceConfig, Config, DEFAULT_ENDPOINT, DEFAULT_MODEL};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::eligibility::validate_eligibility;

/// Get the config directory path (~/.config/loan-check/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".config").join("loan-check"))
        .unwrap_or_else(|| PathBuf::from(".loan-check"))
}

/// Get the default config file path (~/.config/loan-check/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/loan-check/config.yaml) and falls back to built-in defaults
///   when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!("Failed to parse config: invalid YAML in {}", config_path.display())
    })?;

    Ok(config)
}

/// Validate the whole configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref eligibility) = config.eligibility {
        if let Err(mut eligibility_errors) = validate_eligibility(eligibility) {
            errors.append(&mut eligibility_errors);
        }
    }

    if let Some(ref advice) = config.advice {
        errors.extend(advice.validate());
    }

    if let Some(ref level) = config.log_level {
        if tracing_subscriber::EnvFilter::try_new(level).is_err() {
            errors.push(format!("log_level: invalid filter '{}'", level));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
