use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::advice::{AdviceError, GeminiClient};
use crate::config::{AdviceConfig, Config};
use crate::credentials::{resolve_api_key, ApiKey, CredentialError, KeySource, ENV_API_KEY_VAR};

/// Prompt sent to confirm the advice service answers
const CONNECTION_TEST_PROMPT: &str = "Test connection";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warn,
    Fail,
}

/// One line of `loan-check doctor` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentCheck {
    pub name: &'static str,
    pub status: CheckStatus,
    pub detail: String,
}

impl EnvironmentCheck {
    fn new(name: &'static str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name,
            status,
            detail: detail.into(),
        }
    }
}

fn config_check(path: &Path, exists: bool) -> EnvironmentCheck {
    if exists {
        EnvironmentCheck::new("config file", CheckStatus::Ok, path.display().to_string())
    } else {
        EnvironmentCheck::new(
            "config file",
            CheckStatus::Warn,
            format!("{} not found, using defaults (run `loan-check init`)", path.display()),
        )
    }
}

fn dotenv_check(found: Option<&Path>) -> EnvironmentCheck {
    match found {
        Some(path) => EnvironmentCheck::new(".env file", CheckStatus::Ok, path.display().to_string()),
        None => EnvironmentCheck::new(".env file", CheckStatus::Warn, "not found"),
    }
}

fn api_key_check(key: Result<Option<KeySource>, CredentialError>) -> EnvironmentCheck {
    match key {
        Ok(Some(source)) => {
            EnvironmentCheck::new("API key", CheckStatus::Ok, format!("found in {}", source))
        }
        Ok(None) => EnvironmentCheck::new(
            "API key",
            CheckStatus::Fail,
            format!("not found; set {} or run `loan-check auth`", ENV_API_KEY_VAR),
        ),
        Err(e) => EnvironmentCheck::new(
            "API key",
            CheckStatus::Fail,
            format!("{}; set {} instead", e, ENV_API_KEY_VAR),
        ),
    }
}

fn advice_check(config: &Config) -> EnvironmentCheck {
    let advice = config.advice.clone().unwrap_or_default();
    if advice.enabled {
        EnvironmentCheck::new(
            "advice service",
            CheckStatus::Ok,
            format!("enabled ({} at {})", advice.model, advice.endpoint),
        )
    } else {
        EnvironmentCheck::new("advice service", CheckStatus::Warn, "disabled in config")
    }
}

fn service_check(result: Result<(), AdviceError>) -> EnvironmentCheck {
    const NAME: &str = "service reachable";
    match result {
        Ok(()) => EnvironmentCheck::new(NAME, CheckStatus::Ok, "answered a test request"),
        Err(AdviceError::EmptyResponse) => EnvironmentCheck::new(
            NAME,
            CheckStatus::Warn,
            "answered a test request with no text",
        ),
        Err(e @ AdviceError::Unauthorized(_)) => EnvironmentCheck::new(
            NAME,
            CheckStatus::Fail,
            format!("{}; run `loan-check auth` to replace it", e),
        ),
        Err(e) => EnvironmentCheck::new(NAME, CheckStatus::Fail, e.to_string()),
    }
}

fn service_skipped(reason: &str) -> EnvironmentCheck {
    EnvironmentCheck::new("service reachable", CheckStatus::Warn, format!("skipped: {}", reason))
}

/// Send one request to the advice service
async fn test_connection(advice: &AdviceConfig, key: &ApiKey) -> EnvironmentCheck {
    let client = match GeminiClient::new(advice, key.value.clone()) {
        Ok(client) => client,
        Err(e) => {
            return EnvironmentCheck::new(
                "service reachable",
                CheckStatus::Fail,
                format!("could not create client: {:#}", e),
            )
        }
    };

    debug!(model = %advice.model, "testing advice service connection");
    service_check(client.generate(CONNECTION_TEST_PROMPT).await.map(|_| ()))
}

/// Inspect the local environment. Never fails: problems become `Fail` rows.
///
/// `dotenv` is the file loaded at startup, if any. When advice is enabled and
/// a key is found, one live request checks the service end to end.
pub async fn run_checks(
    config_path: &Path,
    config: &Config,
    dotenv: Option<&Path>,
) -> Vec<EnvironmentCheck> {
    let key = resolve_api_key().await;
    let advice = config.advice.clone().unwrap_or_default();

    let service = match key {
        _ if !advice.enabled => service_skipped("advice disabled"),
        Ok(Some(ref key)) => test_connection(&advice, key).await,
        _ => service_skipped("no API key"),
    };

    vec![
        config_check(config_path, config_path.exists()),
        dotenv_check(dotenv),
        api_key_check(key.map(|key| key.map(|k| k.source))),
        advice_check(config),
        service,
    ]
}

pub fn format_checks(checks: &[EnvironmentCheck], use_colors: bool) -> String {
    checks
        .iter()
        .map(|check| {
            let marker = match (check.status, use_colors) {
                (CheckStatus::Ok, true) => "ok  ".green().to_string(),
                (CheckStatus::Warn, true) => "warn".yellow().to_string(),
                (CheckStatus::Fail, true) => "FAIL".red().bold().to_string(),
                (CheckStatus::Ok, false) => "ok  ".to_string(),
                (CheckStatus::Warn, false) => "warn".to_string(),
                (CheckStatus::Fail, false) => "FAIL".to_string(),
            };
            format!("[{}] {:<15} {}", marker, check.name, check.detail)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdviceConfig;

    #[test]
    fn test_missing_config_is_a_warning() {
        let check = config_check(Path::new("/nowhere/config.yaml"), false);
        assert_eq!(check.status, CheckStatus::Warn);
        assert!(check.detail.contains("loan-check init"));
    }

    #[test]
    fn test_api_key_states() {
        assert_eq!(api_key_check(Ok(Some(KeySource::Keyring))).status, CheckStatus::Ok);
        assert!(api_key_check(Ok(Some(KeySource::Environment)))
            .detail
            .contains("GEMINI_API_KEY"));

        let missing = api_key_check(Ok(None));
        assert_eq!(missing.status, CheckStatus::Fail);
        assert!(missing.detail.contains("loan-check auth"));

        let broken = api_key_check(Err(CredentialError::KeyringUnavailable("dbus".to_string())));
        assert_eq!(broken.status, CheckStatus::Fail);
        assert!(broken.detail.contains("dbus"));
    }

    #[test]
    fn test_advice_disabled() {
        let config = Config {
            advice: Some(AdviceConfig {
                enabled: false,
                ..AdviceConfig::default()
            }),
            ..Config::default()
        };
        assert_eq!(advice_check(&config).status, CheckStatus::Warn);
        assert_eq!(advice_check(&Config::default()).status, CheckStatus::Ok);
    }

    #[test]
    fn test_service_answered() {
        assert_eq!(service_check(Ok(())).status, CheckStatus::Ok);
        assert_eq!(service_check(Err(AdviceError::EmptyResponse)).status, CheckStatus::Warn);
    }

    #[test]
    fn test_service_failures_fail() {
        let rejected = service_check(Err(AdviceError::Unauthorized(403)));
        assert_eq!(rejected.status, CheckStatus::Fail);
        assert!(rejected.detail.contains("403"));
        assert!(rejected.detail.contains("loan-check auth"));

        let not_found = service_check(Err(AdviceError::Status {
            status: 404,
            message: "models/gemini-0 is not found".to_string(),
        }));
        assert_eq!(not_found.status, CheckStatus::Fail);
        assert!(not_found.detail.contains("404"));
        assert!(not_found.detail.contains("gemini-0"));

        let garbled = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert_eq!(service_check(Err(AdviceError::Malformed(garbled))).status, CheckStatus::Fail);
        assert_eq!(service_check(Err(AdviceError::MissingApiKey)).status, CheckStatus::Fail);
    }

    #[test]
    fn test_service_skipped_is_a_warning() {
        let skipped = service_skipped("no API key");
        assert_eq!(skipped.name, "service reachable");
        assert_eq!(skipped.status, CheckStatus::Warn);
        assert_eq!(skipped.detail, "skipped: no API key");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_failure_row() {
        // Nothing listens on port 9 locally; the request fails in transport
        let advice = AdviceConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            timeout: "2s".to_string(),
            retries: 0,
            ..AdviceConfig::default()
        };
        let key = ApiKey {
            value: "test-key".to_string(),
            source: KeySource::Environment,
        };
        let check = test_connection(&advice, &key).await;
        assert_eq!(check.name, "service reachable");
        assert_eq!(check.status, CheckStatus::Fail);
    }

    #[test]
    fn test_format_checks_plain() {
        let checks = vec![
            dotenv_check(Some(Path::new("/work/.env"))),
            dotenv_check(None),
        ];
        assert_eq!(
            format_checks(&checks, false),
            "[ok  ] .env file       /work/.env\n[warn] .env file       not found"
        );
    }
}
