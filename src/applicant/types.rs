use serde::{Deserialize, Serialize};

/// Loan terms the application form offers.
pub const LOAN_TERMS: [u32; 3] = [15, 20, 30];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApplicantAttributes {
    pub age: u32,
    pub income: f64,           // Gross annual income
    pub employment_years: f64, // Years in current employment
    pub credit_score: u32,
    pub loan_amount: f64,
    pub debt_to_income: f64, // Percent, 0-100
    pub down_payment: f64,
    pub loan_term: u32, // Years
}

impl ApplicantAttributes {
    /// Amount actually borrowed once the down payment is applied
    pub fn principal(&self) -> f64 {
        self.loan_amount - self.down_payment
    }

    pub fn down_payment_ratio(&self) -> f64 {
        self.down_payment / self.loan_amount
    }

    pub fn monthly_income(&self) -> f64 {
        self.income / 12.0
    }
}
