use serde::Serialize;

/// Fixed monthly payment for an amortizing loan.
///
/// `payment = P * r * (1 + r)^n / ((1 + r)^n - 1)` with `r = annual_rate / 12`
/// and `n = term_years * 12`. Returns 0 for a non-positive principal or a zero
/// term, and `P / n` for a zero rate.
pub fn monthly_payment(principal: f64, term_years: u32, annual_rate: f64) -> f64 {
    if principal <= 0.0 || term_years == 0 {
        return 0.0;
    }

    let monthly_rate = annual_rate / 12.0;
    let num_payments = f64::from(term_years) * 12.0;

    if monthly_rate == 0.0 {
        return principal / num_payments;
    }

    let growth = (1.0 + monthly_rate).powf(num_payments);
    principal * (monthly_rate * growth) / (growth - 1.0)
}

/// Payment details shown next to an eligibility decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaymentSummary {
    pub principal: f64,
    pub term_years: u32,
    pub annual_rate: f64,
    pub monthly_payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
}

impl PaymentSummary {
    pub fn new(principal: f64, term_years: u32, annual_rate: f64) -> Self {
        let monthly_payment = monthly_payment(principal, term_years, annual_rate);
        Self::from_payment(principal, term_years, annual_rate, monthly_payment)
    }

    /// Build a summary around a payment that was already computed, so the
    /// displayed value is the exact one the engine scored.
    pub(crate) fn from_payment(
        principal: f64,
        term_years: u32,
        annual_rate: f64,
        monthly_payment: f64,
    ) -> Self {
        let total_paid = monthly_payment * f64::from(term_years) * 12.0;
        let total_interest = (total_paid - principal.max(0.0)).max(0.0);
        Self {
            principal,
            term_years,
            annual_rate,
            monthly_payment,
            total_paid,
            total_interest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_payment() {
        // 200k over 30 years at 6% is the textbook 1199.10
        let payment = monthly_payment(200_000.0, 30, 0.06);
        assert!((payment - 1199.10).abs() < 0.01);
    }

    #[test]
    fn test_zero_rate_is_exact_division() {
        assert_eq!(monthly_payment(360_000.0, 30, 0.0), 360_000.0 / 360.0);
        assert_eq!(monthly_payment(100_000.0, 15, 0.0), 100_000.0 / 180.0);
    }

    #[test]
    fn test_zero_principal_or_term() {
        assert_eq!(monthly_payment(0.0, 30, 0.06), 0.0);
        assert_eq!(monthly_payment(-5_000.0, 30, 0.06), 0.0);
        assert_eq!(monthly_payment(250_000.0, 0, 0.06), 0.0);
    }

    #[test]
    fn test_increases_with_principal() {
        let mut previous = 0.0;
        for principal in [1_000.0, 50_000.0, 250_000.0, 1_000_000.0, 5_000_000.0] {
            let payment = monthly_payment(principal, 20, 0.06);
            assert!(payment > previous);
            previous = payment;
        }
    }

    #[test]
    fn test_increases_with_rate() {
        let mut previous = monthly_payment(300_000.0, 30, 0.0);
        for rate in [0.01, 0.03, 0.06, 0.09, 0.15] {
            let payment = monthly_payment(300_000.0, 30, rate);
            assert!(payment > previous, "rate {}", rate);
            previous = payment;
        }
    }

    #[test]
    fn test_decreases_with_term() {
        let p15 = monthly_payment(300_000.0, 15, 0.06);
        let p20 = monthly_payment(300_000.0, 20, 0.06);
        let p30 = monthly_payment(300_000.0, 30, 0.06);
        assert!(p15 > p20);
        assert!(p20 > p30);
    }

    #[test]
    fn test_summary_totals() {
        let summary = PaymentSummary::new(200_000.0, 30, 0.06);
        assert_eq!(summary.monthly_payment, monthly_payment(200_000.0, 30, 0.06));
        assert!((summary.total_paid - summary.monthly_payment * 360.0).abs() < 1e-6);
        assert!((summary.total_interest - (summary.total_paid - 200_000.0)).abs() < 1e-6);
    }

    #[test]
    fn test_summary_for_paid_off_loan() {
        let summary = PaymentSummary::new(0.0, 30, 0.06);
        assert_eq!(summary.monthly_payment, 0.0);
        assert_eq!(summary.total_paid, 0.0);
        assert_eq!(summary.total_interest, 0.0);
    }
}
