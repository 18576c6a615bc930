use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::{debug, warn};

use super::cache::EducationCache;
use super::prompt::{build_advice_prompt, build_education_prompt};
use super::{AdviceError, AdviceProvider, AdviceRequest, EducationTopic};
use crate::config::AdviceConfig;

/// Longest error body kept in `AdviceError::Status`
const MAX_ERROR_BODY: usize = 300;

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Pull `candidates[0].content.parts[0].text` out of a generateContent body.
fn extract_text(body: &str) -> Result<String, AdviceError> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(AdviceError::EmptyResponse)
}

fn generate_content_url(endpoint: &str, model: &str) -> String {
    format!("{}/models/{}:generateContent", endpoint.trim_end_matches('/'), model)
}

fn truncate(body: &str, max_chars: usize) -> String {
    if body.chars().count() <= max_chars {
        body.to_string()
    } else {
        format!("{}...", body.chars().take(max_chars).collect::<String>())
    }
}

/// Client for Google's Gemini generateContent REST endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    url: String,
    model: String,
    api_key: String,
    retries: usize,
    cache: Option<EducationCache>,
}

impl GeminiClient {
    pub fn new(config: &AdviceConfig, api_key: String) -> anyhow::Result<Self> {
        let timeout = config
            .timeout()
            .map_err(|e| anyhow::anyhow!("advice.timeout: {}", e))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("loan-check/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            url: generate_content_url(&config.endpoint, &config.model),
            model: config.model.clone(),
            api_key,
            retries: config.retries,
            cache: None,
        })
    }

    /// Serve education requests from (and store them in) `cache`
    pub fn with_cache(mut self, cache: EducationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    async fn send_once(&self, prompt: &str) -> Result<String, AdviceError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AdviceError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            return Err(AdviceError::Status {
                status: status.as_u16(),
                message: truncate(&text, MAX_ERROR_BODY),
            });
        }

        extract_text(&text)
    }

    /// Send a prompt, retrying transient failures with exponential backoff
    pub async fn generate(&self, prompt: &str) -> Result<String, AdviceError> {
        if self.api_key.trim().is_empty() {
            return Err(AdviceError::MissingApiKey);
        }

        debug!(model = %self.model, prompt_chars = prompt.len(), "requesting text generation");

        let retry_strategy = ExponentialBackoff::from_millis(200)
            .max_delay(Duration::from_secs(5))
            .take(self.retries);

        RetryIf::start(
            retry_strategy,
            || self.send_once(prompt),
            |e: &AdviceError| {
                let transient = e.is_transient();
                if transient {
                    warn!(error = %e, "advice request failed, retrying");
                }
                transient
            },
        )
        .await
    }
}

impl AdviceProvider for GeminiClient {
    async fn advice(&self, request: &AdviceRequest<'_>) -> Result<String, AdviceError> {
        debug!("requesting loan advice");
        self.generate(&build_advice_prompt(request)).await
    }

    async fn education(&self, topic: EducationTopic) -> Result<String, AdviceError> {
        if let Some(ref cache) = self.cache {
            if let Some(content) = cache.get(&self.model, topic) {
                debug!(topic = topic.slug(), "education served from cache");
                return Ok(content);
            }
        }

        debug!(topic = topic.slug(), "requesting financial education");
        let content = self.generate(&build_education_prompt(topic)).await?;

        if let Some(ref cache) = self.cache {
            // Ignore cache write errors
            if let Err(e) = cache.put(&self.model, topic, &content) {
                debug!(error = %e, "could not cache education content");
            }
        }

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Pay down your card balances."}], "role": "model"}}
            ],
            "usageMetadata": {"totalTokenCount": 42}
        }"#;
        assert_eq!(extract_text(body).unwrap(), "Pay down your card balances.");
    }

    #[test]
    fn test_extract_text_no_candidates() {
        assert!(matches!(
            extract_text(r#"{"candidates": []}"#),
            Err(AdviceError::EmptyResponse)
        ));
        assert!(matches!(
            extract_text(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#),
            Err(AdviceError::EmptyResponse)
        ));
    }

    #[test]
    fn test_extract_text_blank() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#;
        assert!(matches!(extract_text(body), Err(AdviceError::EmptyResponse)));
    }

    #[test]
    fn test_extract_text_malformed() {
        assert!(matches!(extract_text("<html>"), Err(AdviceError::Malformed(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "hello" }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_generate_content_url() {
        assert_eq!(
            generate_content_url("https://example.test/v1beta/", "gemini-2.0-flash"),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(
            generate_content_url(crate::config::DEFAULT_ENDPOINT, "m"),
            "https://generativelanguage.googleapis.com/v1beta/models/m:generateContent"
        );
    }
}
