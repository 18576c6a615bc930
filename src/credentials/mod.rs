pub mod prompt;

use keyring::Entry;
use std::fmt;
use thiserror::Error;

const SERVICE_NAME: &str = "loan-check";
const API_KEY_ENTRY: &str = "gemini-api-key";

/// Environment variable holding the advice service API key (also read from .env)
pub const ENV_API_KEY_VAR: &str = "GEMINI_API_KEY";

pub use prompt::{prompt_for_api_key, setup_api_key};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Keyring unavailable: {0}")]
    KeyringUnavailable(String),
    #[error("API key not found in keyring")]
    KeyNotFound,
    #[error("Failed to store API key: {0}")]
    StoreFailed(String),
}

/// Where an API key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    Keyring,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Environment => write!(f, "{} environment variable", ENV_API_KEY_VAR),
            KeySource::Keyring => write!(f, "system keyring"),
        }
    }
}

#[derive(Clone)]
pub struct ApiKey {
    pub value: String,
    pub source: KeySource,
}

// Never print the key itself
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Check for an API key in the GEMINI_API_KEY environment variable.
/// Returns Some(key) if the env var is set and non-empty, None otherwise.
pub fn get_key_from_env() -> Option<String> {
    std::env::var(ENV_API_KEY_VAR)
        .ok()
        .and_then(|val| non_empty(&val))
}

/// Synchronous version of get_key - retrieves the key from the system keyring
fn get_key_sync() -> Result<String, CredentialError> {
    let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
        .map_err(|e| CredentialError::KeyringUnavailable(format!("{}", e)))?;

    entry.get_password().map_err(|e| match e {
        keyring::Error::NoEntry => CredentialError::KeyNotFound,
        _ => CredentialError::KeyringUnavailable(format!("{}", e)),
    })
}

/// Synchronous version of store_key - stores the key in the system keyring
fn store_key_sync(key: &str) -> Result<(), CredentialError> {
    let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
        .map_err(|e| CredentialError::KeyringUnavailable(format!("{}", e)))?;

    entry
        .set_password(key)
        .map_err(|e| CredentialError::StoreFailed(format!("{}", e)))?;

    Ok(())
}

/// Async wrapper for get_key_sync
/// Uses spawn_blocking to prevent blocking the async runtime
pub async fn get_key() -> Result<String, CredentialError> {
    tokio::task::spawn_blocking(get_key_sync)
        .await
        .map_err(|e| CredentialError::KeyringUnavailable(format!("Task join error: {}", e)))?
}

/// Async wrapper for store_key_sync
/// Uses spawn_blocking to prevent blocking the async runtime
pub async fn store_key(key: String) -> Result<(), CredentialError> {
    tokio::task::spawn_blocking(move || store_key_sync(&key))
        .await
        .map_err(|e| CredentialError::KeyringUnavailable(format!("Task join error: {}", e)))?
}

/// Pick the key from the environment first, then the keyring.
fn pick_key(
    env_key: Option<String>,
    keyring_key: impl FnOnce() -> Result<String, CredentialError>,
) -> Result<Option<ApiKey>, CredentialError> {
    if let Some(value) = env_key {
        return Ok(Some(ApiKey {
            value,
            source: KeySource::Environment,
        }));
    }

    match keyring_key() {
        Ok(value) => Ok(non_empty(&value).map(|value| ApiKey {
            value,
            source: KeySource::Keyring,
        })),
        Err(CredentialError::KeyNotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Resolve the API key without prompting.
///
/// Ok(None) means no key is configured anywhere; an unavailable keyring is
/// reported as an error so callers can explain it.
pub async fn resolve_api_key() -> Result<Option<ApiKey>, CredentialError> {
    if let Some(value) = get_key_from_env() {
        return pick_key(Some(value), || Err(CredentialError::KeyNotFound));
    }

    let keyring_result = get_key().await;
    pick_key(None, move || keyring_result)
}
