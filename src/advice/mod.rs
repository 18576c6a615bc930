pub mod cache;
pub mod gemini;
pub mod prompt;
pub mod topics;

pub use gemini::GeminiClient;
pub use topics::EducationTopic;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::applicant::ApplicantAttributes;
use crate::eligibility::EligibilityResult;

pub const ADVICE_UNAVAILABLE: &str = "Failed to get AI advice. Please try again later.";
pub const EDUCATION_UNAVAILABLE: &str =
    "Failed to get educational content. Please try again later.";

/// Everything the advisor gets to see about one decision.
#[derive(Debug, Clone, Copy)]
pub struct AdviceRequest<'a> {
    pub attributes: &'a ApplicantAttributes,
    pub eligible: bool,
    pub confidence_percent: f64,
    pub findings: &'a [String],
}

impl<'a> AdviceRequest<'a> {
    pub fn new(attributes: &'a ApplicantAttributes, result: &'a EligibilityResult) -> Self {
        Self {
            attributes,
            eligible: result.eligible,
            confidence_percent: result.confidence_percent,
            findings: &result.findings,
        }
    }
}

#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("no API key configured for the advice service")]
    MissingApiKey,
    #[error("request to advice service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("advice service rejected the API key (HTTP {0})")]
    Unauthorized(u16),
    #[error("advice service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("advice service returned malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("advice service returned no text")]
    EmptyResponse,
}

impl AdviceError {
    /// Worth retrying: timeouts, connection problems, rate limits, 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            AdviceError::Transport(e) => e.is_timeout() || e.is_connect(),
            AdviceError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Text-generation collaborator. Output is opaque text.
#[allow(async_fn_in_trait)]
pub trait AdviceProvider {
    async fn advice(&self, request: &AdviceRequest<'_>) -> Result<String, AdviceError>;

    async fn education(&self, topic: EducationTopic) -> Result<String, AdviceError>;
}

/// Advice text, or the message to show instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum AdviceOutcome {
    Delivered(String),
    Unavailable(String),
}

impl AdviceOutcome {
    pub fn text(&self) -> &str {
        match self {
            AdviceOutcome::Delivered(text) | AdviceOutcome::Unavailable(text) => text,
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, AdviceOutcome::Delivered(_))
    }
}

/// Ask for advice; any failure is logged and turned into a visible,
/// non-fatal message.
pub async fn advice_or_unavailable<P: AdviceProvider>(
    provider: &P,
    request: &AdviceRequest<'_>,
) -> AdviceOutcome {
    match provider.advice(request).await {
        Ok(text) => {
            info!(chars = text.len(), "received loan advice");
            AdviceOutcome::Delivered(text)
        }
        Err(e) => {
            error!(error = %e, "error getting AI advice");
            AdviceOutcome::Unavailable(ADVICE_UNAVAILABLE.to_string())
        }
    }
}

/// Education counterpart of `advice_or_unavailable`.
pub async fn education_or_unavailable<P: AdviceProvider>(
    provider: &P,
    topic: EducationTopic,
) -> AdviceOutcome {
    match provider.education(topic).await {
        Ok(text) => {
            info!(topic = topic.slug(), chars = text.len(), "received educational content");
            AdviceOutcome::Delivered(text)
        }
        Err(e) => {
            error!(topic = topic.slug(), error = %e, "error getting educational content");
            AdviceOutcome::Unavailable(EDUCATION_UNAVAILABLE.to_string())
        }
    }
}
