pub mod formatter;

use serde::Serialize;

use crate::advice::{AdviceOutcome, EducationTopic};
use crate::applicant::ApplicantAttributes;
use crate::eligibility::{EligibilityResult, PaymentSummary};

pub use formatter::{
    divider, format_amount, format_breakdown, format_field_errors, format_money, format_payment,
    format_result, format_topics, should_use_colors,
};

/// `check --json` document
#[derive(Debug, Serialize)]
pub struct CheckReport<'a> {
    pub application: &'a ApplicantAttributes,
    pub result: &'a EligibilityResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<&'a AdviceOutcome>,
}

/// `learn --json` document
#[derive(Debug, Serialize)]
pub struct EducationReport<'a> {
    pub topic: EducationTopic,
    pub title: &'static str,
    pub content: &'a AdviceOutcome,
}

/// `payment --json` document
#[derive(Debug, Serialize)]
pub struct PaymentReport<'a> {
    pub payment: &'a PaymentSummary,
}

/// `check --json` output when caller-side validation fails
#[derive(Debug, Serialize)]
pub struct FieldErrorsReport<'a> {
    pub errors: &'a [String],
}

/// Pretty JSON for any report
pub fn to_json<T: Serialize>(report: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
