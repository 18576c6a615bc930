use super::types::{ApplicantAttributes, LOAN_TERMS};

/// Form-level validation run before the eligibility engine.
/// Returns all validation errors at once (not just the first).
pub fn validate_application(attributes: &ApplicantAttributes) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if attributes.age < 18 {
        errors.push("Age must be at least 18 years".to_string());
    }

    // `!(x > 0.0)` also rejects NaN
    if !(attributes.income > 0.0) {
        errors.push("Annual income must be greater than 0".to_string());
    }

    if !(attributes.employment_years >= 0.0) {
        errors.push("Employment years cannot be negative".to_string());
    }

    if !(300..=850).contains(&attributes.credit_score) {
        errors.push("Credit score must be between 300 and 850".to_string());
    }

    if !(attributes.loan_amount > 0.0) {
        errors.push("Loan amount must be greater than 0".to_string());
    }

    if !(0.0..=100.0).contains(&attributes.debt_to_income) {
        errors.push("Debt-to-income ratio must be between 0 and 100".to_string());
    }

    if !(attributes.down_payment >= 0.0) {
        errors.push("Down payment cannot be negative".to_string());
    }

    if attributes.down_payment > attributes.loan_amount {
        errors.push("Down payment cannot be greater than loan amount".to_string());
    }

    if !LOAN_TERMS.contains(&attributes.loan_term) {
        errors.push("Loan term must be 15, 20, or 30 years".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
