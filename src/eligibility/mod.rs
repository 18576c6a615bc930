pub mod amortization;
pub mod config;
pub mod engine;
pub mod ramp;
pub mod validation;

pub use amortization::{monthly_payment, PaymentSummary};
pub use config::*;
pub use engine::{evaluate, evaluate_form, Criterion, CriterionScore, EligibilityResult};
pub use ramp::{Direction, Ramp};
pub use validation::validate_eligibility;
