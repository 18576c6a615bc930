use serde::Serialize;
use std::fmt;

use super::amortization::{monthly_payment, PaymentSummary};
use super::config::EligibilityConfig;
use super::ramp::{Direction, Ramp};
use crate::applicant::{ApplicantAttributes, ApplicationForm};

pub const INVALID_INPUT_FINDING: &str = "Invalid input data. Please check your inputs.";
pub const ALL_CRITERIA_MET_FINDING: &str = "All criteria have been met successfully!";

/// Evaluation criteria, in the order they are scored and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    CreditScore,
    DebtToIncome,
    DownPayment,
    EmploymentYears,
    IncomeToLoan,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::CreditScore,
        Criterion::DebtToIncome,
        Criterion::DownPayment,
        Criterion::EmploymentYears,
        Criterion::IncomeToLoan,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Criterion::CreditScore => "Credit score",
            Criterion::DebtToIncome => "Debt-to-income",
            Criterion::DownPayment => "Down payment",
            Criterion::EmploymentYears => "Employment",
            Criterion::IncomeToLoan => "Payment-to-income",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub value: f64,        // Measured input, e.g. 700 or 0.2 (down payment ratio)
    pub weight: f64,       // Partial credit in [0, 1]
    pub fixed_weight: f64, // Share of the combined score
    pub contribution: f64, // weight * fixed_weight
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityResult {
    pub eligible: bool,
    pub confidence_percent: f64,
    pub findings: Vec<String>,
    pub breakdown: Vec<CriterionScore>,
    /// Payment the income criterion was scored on; None for invalid input.
    pub payment: Option<PaymentSummary>,
}

impl EligibilityResult {
    pub fn invalid_input() -> Self {
        Self {
            eligible: false,
            confidence_percent: 0.0,
            findings: vec![INVALID_INPUT_FINDING.to_string()],
            breakdown: Vec::new(),
            payment: None,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        self.payment.is_none() && self.findings.len() == 1 && self.findings[0] == INVALID_INPUT_FINDING
    }
}

/// Engine-side sanity checks. Independent of (and looser than) the form
/// validation in `applicant::validate_application`.
fn is_structurally_valid(attributes: &ApplicantAttributes) -> bool {
    let reals = [
        attributes.income,
        attributes.employment_years,
        attributes.loan_amount,
        attributes.debt_to_income,
        attributes.down_payment,
    ];
    if reals.iter().any(|value| !value.is_finite()) {
        return false;
    }

    attributes.income > 0.0
        && attributes.loan_amount > 0.0
        && attributes.down_payment <= attributes.loan_amount
}

/// Score an applicant.
///
/// Pure: no I/O, no logging, no hidden state. Out-of-range numbers never
/// fail; only structurally invalid input yields `EligibilityResult::invalid_input`.
pub fn evaluate(attributes: &ApplicantAttributes, config: &EligibilityConfig) -> EligibilityResult {
    if !is_structurally_valid(attributes) {
        return EligibilityResult::invalid_input();
    }

    // Income to loan inputs come first: a ratio that cannot be expressed is invalid input
    let principal = attributes.principal();
    let payment = monthly_payment(principal, attributes.loan_term, config.annual_rate);
    let income_to_loan_ratio = if payment == 0.0 {
        0.0
    } else {
        payment / attributes.monthly_income()
    };
    if !income_to_loan_ratio.is_finite() {
        return EligibilityResult::invalid_input();
    }

    let weights = &config.weights;
    let mut findings = Vec::new();
    let mut breakdown = Vec::with_capacity(Criterion::ALL.len());

    let mut score_criterion = |criterion: Criterion, value: f64, ramp: Ramp, fixed_weight: f64| {
        let weight = ramp.weight(value);
        breakdown.push(CriterionScore {
            criterion,
            value,
            weight,
            fixed_weight,
            contribution: weight * fixed_weight,
        });
        weight
    };

    // Credit score
    let credit_score = f64::from(attributes.credit_score);
    let credit_weight = score_criterion(
        Criterion::CreditScore,
        credit_score,
        Ramp::new(&config.credit_score, Direction::HigherIsBetter),
        weights.credit_score,
    );
    if credit_weight < 1.0 {
        findings.push(format!(
            "Credit score ({}) is below the minimum required ({})",
            attributes.credit_score, config.credit_score.threshold
        ));
    }

    // Debt-to-income
    let dti_weight = score_criterion(
        Criterion::DebtToIncome,
        attributes.debt_to_income,
        Ramp::new(&config.debt_to_income, Direction::LowerIsBetter),
        weights.debt_to_income,
    );
    if dti_weight < 1.0 {
        findings.push(format!(
            "Debt-to-income ratio ({}%) exceeds the maximum allowed ({}%)",
            attributes.debt_to_income, config.debt_to_income.threshold
        ));
    }

    // Down payment
    let down_payment_ratio = attributes.down_payment_ratio();
    let down_payment_weight = score_criterion(
        Criterion::DownPayment,
        down_payment_ratio,
        Ramp::new(&config.down_payment, Direction::HigherIsBetter),
        weights.down_payment,
    );
    if down_payment_weight < 1.0 {
        findings.push(format!(
            "Down payment ratio ({:.1}%) is below the minimum required ({:.1}%)",
            down_payment_ratio * 100.0,
            config.down_payment.threshold * 100.0
        ));
    }

    // Employment history
    let employment_weight = score_criterion(
        Criterion::EmploymentYears,
        attributes.employment_years,
        Ramp::new(&config.employment_years, Direction::HigherIsBetter),
        weights.employment_years,
    );
    if employment_weight < 1.0 {
        findings.push(format!(
            "Employment history ({} years) is below the minimum required ({} years)",
            attributes.employment_years, config.employment_years.threshold
        ));
    }

    // Income to loan: the payment computed above is the one reported back
    let income_weight = score_criterion(
        Criterion::IncomeToLoan,
        income_to_loan_ratio,
        Ramp::new(&config.income_to_loan, Direction::LowerIsBetter),
        weights.income_to_loan,
    );
    if income_weight < 1.0 {
        findings.push(format!(
            "Monthly payment to income ratio ({:.1}%) exceeds the maximum allowed ({:.1}%)",
            income_to_loan_ratio * 100.0,
            config.income_to_loan.threshold * 100.0
        ));
    }

    let score: f64 = breakdown.iter().map(|c| c.contribution).sum();
    let confidence_percent = score * 100.0;
    let eligible = confidence_percent >= config.pass_mark * 100.0;

    if eligible && findings.is_empty() {
        findings.push(ALL_CRITERIA_MET_FINDING.to_string());
    }

    EligibilityResult {
        eligible,
        confidence_percent,
        findings,
        breakdown,
        payment: Some(PaymentSummary::from_payment(
            principal,
            attributes.loan_term,
            config.annual_rate,
            payment,
        )),
    }
}

/// Score a possibly incomplete form. Missing fields yield the invalid-input result.
pub fn evaluate_form(form: &ApplicationForm, config: &EligibilityConfig) -> EligibilityResult {
    match form.clone().into_attributes() {
        Ok(attributes) => evaluate(&attributes, config),
        Err(_) => EligibilityResult::invalid_input(),
    }
}
