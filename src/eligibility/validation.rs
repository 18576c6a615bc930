use super::config::{EligibilityConfig, RampConfig};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

fn validate_ramp(name: &str, ramp: &RampConfig, errors: &mut Vec<String>) {
    if !ramp.threshold.is_finite() || !ramp.full_at.is_finite() {
        errors.push(format!("eligibility.{}: threshold and full_at must be finite", name));
    }
    if !(ramp.band > 0.0) || !ramp.band.is_finite() {
        errors.push(format!(
            "eligibility.{}.band: must be a positive number, got {}",
            name, ramp.band
        ));
    }
}

/// Validate eligibility configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_eligibility(config: &EligibilityConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    validate_ramp("credit_score", &config.credit_score, &mut errors);
    validate_ramp("debt_to_income", &config.debt_to_income, &mut errors);
    validate_ramp("down_payment", &config.down_payment, &mut errors);
    validate_ramp("employment_years", &config.employment_years, &mut errors);
    validate_ramp("income_to_loan", &config.income_to_loan, &mut errors);

    // Higher-is-better criteria reach full credit above their threshold,
    // lower-is-better ones below it
    for (name, ramp) in [
        ("credit_score", &config.credit_score),
        ("down_payment", &config.down_payment),
        ("employment_years", &config.employment_years),
    ] {
        if ramp.full_at < ramp.threshold {
            errors.push(format!(
                "eligibility.{}.full_at: must not be below threshold ({} < {})",
                name, ramp.full_at, ramp.threshold
            ));
        }
    }
    for (name, ramp) in [
        ("debt_to_income", &config.debt_to_income),
        ("income_to_loan", &config.income_to_loan),
    ] {
        if ramp.full_at > ramp.threshold {
            errors.push(format!(
                "eligibility.{}.full_at: must not be above threshold ({} > {})",
                name, ramp.full_at, ramp.threshold
            ));
        }
    }

    let weights = &config.weights;
    for (name, value) in [
        ("credit_score", weights.credit_score),
        ("debt_to_income", weights.debt_to_income),
        ("down_payment", weights.down_payment),
        ("employment_years", weights.employment_years),
        ("income_to_loan", weights.income_to_loan),
    ] {
        if !(value >= 0.0) {
            errors.push(format!("eligibility.weights.{}: must be non-negative", name));
        }
    }
    let total = weights.total();
    if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        errors.push(format!("eligibility.weights: must sum to 1.0, got {}", total));
    }

    if !(0.0..=1.0).contains(&config.pass_mark) {
        errors.push(format!(
            "eligibility.pass_mark: must be between 0 and 1, got {}",
            config.pass_mark
        ));
    }

    if !(config.annual_rate >= 0.0) || !config.annual_rate.is_finite() {
        errors.push(format!(
            "eligibility.annual_rate: must be a non-negative number, got {}",
            config.annual_rate
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
