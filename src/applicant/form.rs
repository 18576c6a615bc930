use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::types::ApplicantAttributes;

/// Application as collected from a file or the command line.
///
/// Every field is optional here; `into_attributes` reports the missing ones.
///
/// Example YAML:
/// ```yaml
/// age: 30
/// income: 500000
/// employment_years: 5
/// credit_score: 700
/// loan_amount: 2000000
/// debt_to_income: 30
/// down_payment: 400000
/// loan_term: 30
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicationForm {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub income: Option<f64>,
    #[serde(default)]
    pub employment_years: Option<f64>,
    #[serde(default)]
    pub credit_score: Option<u32>,
    #[serde(default)]
    pub loan_amount: Option<f64>,
    #[serde(default)]
    pub debt_to_income: Option<f64>,
    #[serde(default)]
    pub down_payment: Option<f64>,
    #[serde(default)]
    pub loan_term: Option<u32>,
}

impl ApplicationForm {
    /// Load an application from a YAML or JSON file (JSON when the
    /// extension is `.json`).
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read application file at {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&content).with_context(|| {
                format!("Failed to parse application: invalid JSON in {}", path.display())
            })
        } else {
            serde_saphyr::from_str(&content).with_context(|| {
                format!("Failed to parse application: invalid YAML in {}", path.display())
            })
        }
    }

    /// Fill in fields from `overrides`, which win where both are set.
    pub fn merge(self, overrides: ApplicationForm) -> Self {
        Self {
            age: overrides.age.or(self.age),
            income: overrides.income.or(self.income),
            employment_years: overrides.employment_years.or(self.employment_years),
            credit_score: overrides.credit_score.or(self.credit_score),
            loan_amount: overrides.loan_amount.or(self.loan_amount),
            debt_to_income: overrides.debt_to_income.or(self.debt_to_income),
            down_payment: overrides.down_payment.or(self.down_payment),
            loan_term: overrides.loan_term.or(self.loan_term),
        }
    }

    /// Names of the fields that are still unset, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("age", self.age.is_none()),
            ("income", self.income.is_none()),
            ("employment_years", self.employment_years.is_none()),
            ("credit_score", self.credit_score.is_none()),
            ("loan_amount", self.loan_amount.is_none()),
            ("debt_to_income", self.debt_to_income.is_none()),
            ("down_payment", self.down_payment.is_none()),
            ("loan_term", self.loan_term.is_none()),
        ];
        checks
            .into_iter()
            .filter_map(|(name, missing)| missing.then_some(name))
            .collect()
    }

    /// Convert into a complete attributes record.
    /// Returns one "<field> is required" message per missing field.
    pub fn into_attributes(self) -> Result<ApplicantAttributes, Vec<String>> {
        match self {
            ApplicationForm {
                age: Some(age),
                income: Some(income),
                employment_years: Some(employment_years),
                credit_score: Some(credit_score),
                loan_amount: Some(loan_amount),
                debt_to_income: Some(debt_to_income),
                down_payment: Some(down_payment),
                loan_term: Some(loan_term),
            } => Ok(ApplicantAttributes {
                age,
                income,
                employment_years,
                credit_score,
                loan_amount,
                debt_to_income,
                down_payment,
                loan_term,
            }),
            form => Err(form
                .missing_fields()
                .into_iter()
                .map(|name| format!("{} is required", name))
                .collect()),
        }
    }
}

impl From<&ApplicantAttributes> for ApplicationForm {
    fn from(attributes: &ApplicantAttributes) -> Self {
        Self {
            age: Some(attributes.age),
            income: Some(attributes.income),
            employment_years: Some(attributes.employment_years),
            credit_score: Some(attributes.credit_score),
            loan_amount: Some(attributes.loan_amount),
            debt_to_income: Some(attributes.debt_to_income),
            down_payment: Some(attributes.down_payment),
            loan_term: Some(attributes.loan_term),
        }
    }
}
