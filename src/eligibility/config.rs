use serde::{Deserialize, Serialize};

/// Minimum credit score; the centre of the credit ramp.
pub const MIN_CREDIT_SCORE: f64 = 620.0;
/// Maximum debt-to-income ratio, in percent.
pub const MAX_DEBT_TO_INCOME: f64 = 43.0;
/// Minimum down payment as a fraction of the loan amount.
pub const MIN_DOWN_PAYMENT_RATIO: f64 = 0.20;
/// Minimum years in current employment.
pub const MIN_EMPLOYMENT_YEARS: f64 = 2.0;
/// Maximum share of monthly income the loan payment may take.
pub const MAX_PAYMENT_TO_INCOME_RATIO: f64 = 0.28;
/// Annual interest rate used for the amortization.
pub const ANNUAL_RATE: f64 = 0.06;
/// Combined score an applicant needs to be eligible.
pub const PASS_MARK: f64 = 0.70;

/// Eligibility engine configuration.
///
/// Every threshold, fixed weight and rate the engine uses lives here so
/// callers can tune them without touching the combination logic. Any
/// section left out of the YAML falls back to its default.
///
/// Example YAML:
/// ```yaml
/// eligibility:
///   pass_mark: 0.7
///   annual_rate: 0.06
///   credit_score: { threshold: 620, full_at: 720, band: 200 }
///   weights:
///     credit_score: 0.25
///     debt_to_income: 0.25
///     down_payment: 0.2
///     employment_years: 0.15
///     income_to_loan: 0.15
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EligibilityConfig {
    /// Credit score ramp (higher is better)
    pub credit_score: RampConfig,

    /// Debt-to-income ramp in percent (lower is better)
    pub debt_to_income: RampConfig,

    /// Down payment / loan amount ramp (higher is better)
    pub down_payment: RampConfig,

    /// Employment years ramp (higher is better)
    pub employment_years: RampConfig,

    /// Monthly payment / monthly income ramp (lower is better)
    pub income_to_loan: RampConfig,

    /// Fixed share of the combined score carried by each criterion
    pub weights: CriterionWeights,

    /// Combined score (0..=1) at or above which an applicant is eligible
    pub pass_mark: f64,

    /// Annual rate fed into the monthly payment calculation
    pub annual_rate: f64,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            credit_score: RampConfig {
                threshold: MIN_CREDIT_SCORE,
                full_at: MIN_CREDIT_SCORE + 100.0,
                band: 200.0,
            },
            debt_to_income: RampConfig {
                threshold: MAX_DEBT_TO_INCOME,
                full_at: MAX_DEBT_TO_INCOME - 10.0,
                band: 20.0,
            },
            down_payment: RampConfig {
                threshold: MIN_DOWN_PAYMENT_RATIO,
                full_at: 0.30,
                band: 0.20,
            },
            employment_years: RampConfig {
                threshold: MIN_EMPLOYMENT_YEARS,
                full_at: MIN_EMPLOYMENT_YEARS + 3.0,
                band: 6.0,
            },
            income_to_loan: RampConfig {
                threshold: MAX_PAYMENT_TO_INCOME_RATIO,
                full_at: 0.23,
                band: 0.10,
            },
            weights: CriterionWeights::default(),
            pass_mark: PASS_MARK,
            annual_rate: ANNUAL_RATE,
        }
    }
}

/// One gradual-scale criterion.
///
/// `threshold` is the value that earns half credit, `full_at` the value from
/// which the criterion is fully satisfied, and `band` the distance over which
/// credit moves from 0.5 to 1.5 (before clamping).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RampConfig {
    pub threshold: f64,
    pub full_at: f64,
    pub band: f64,
}

/// Fixed per-criterion weights. Must sum to 1.0.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CriterionWeights {
    pub credit_score: f64,
    pub debt_to_income: f64,
    pub down_payment: f64,
    pub employment_years: f64,
    pub income_to_loan: f64,
}

impl Default for CriterionWeights {
    fn default() -> Self {
        Self {
            credit_score: 0.25,
            debt_to_income: 0.25,
            down_payment: 0.20,
            employment_years: 0.15,
            income_to_loan: 0.15,
        }
    }
}

impl CriterionWeights {
    pub fn total(&self) -> f64 {
        self.credit_score
            + self.debt_to_income
            + self.down_payment
            + self.employment_years
            + self.income_to_loan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_eligibility_config() {
        let config = EligibilityConfig::default();

        assert_eq!(config.credit_score.threshold, 620.0);
        assert_eq!(config.credit_score.full_at, 720.0);
        assert_eq!(config.debt_to_income.full_at, 33.0);
        assert_eq!(config.employment_years.full_at, 5.0);
        assert_eq!(config.pass_mark, 0.70);
        assert_eq!(config.annual_rate, 0.06);
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = CriterionWeights::default();
        assert!((weights.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_eligibility_config_serde_roundtrip() {
        let config = EligibilityConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: EligibilityConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_eligibility_config_parse() {
        let yaml = r#"
pass_mark: 0.8
credit_score: { threshold: 640, full_at: 740, band: 200 }
"#;
        let config: EligibilityConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.pass_mark, 0.8);
        assert_eq!(config.credit_score.threshold, 640.0);
        // Untouched sections keep their defaults
        assert_eq!(config.debt_to_income, EligibilityConfig::default().debt_to_income);
        assert_eq!(config.weights, CriterionWeights::default());
    }

    #[test]
    fn test_partial_weights_parse() {
        let yaml = r#"
weights:
  credit_score: 0.3
  debt_to_income: 0.2
"#;
        let config: EligibilityConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.weights.credit_score, 0.3);
        assert_eq!(config.weights.debt_to_income, 0.2);
        assert_eq!(config.weights.down_payment, 0.20);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "pass_mrk: 0.5";
        let result: Result<EligibilityConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }
}
