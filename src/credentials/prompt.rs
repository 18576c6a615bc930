use anyhow::{Context, Result};

use super::{store_key, ApiKey, KeySource};

/// Prompts user to enter a Gemini API key (hidden input)
pub fn prompt_for_api_key() -> Result<String> {
    println!("Gemini API key required for AI-powered advice.");
    println!("Create one at: https://aistudio.google.com/app/apikey");
    println!();

    let key = rpassword::prompt_password("Enter API key: ")
        .context("Failed to read API key from stdin")?;

    let key = key.trim();

    if key.is_empty() {
        anyhow::bail!("API key cannot be empty");
    }

    Ok(key.to_string())
}

/// Prompt for an API key and store it in the keyring, replacing any stored key.
pub async fn setup_api_key() -> Result<ApiKey> {
    let value = prompt_for_api_key()?;

    store_key(value.clone())
        .await
        .context("Failed to store API key in keyring")?;

    println!("API key stored securely in system keyring.");

    Ok(ApiKey {
        value,
        source: KeySource::Keyring,
    })
}
