pub mod form;
pub mod types;
pub mod validation;

pub use form::ApplicationForm;
pub use types::{ApplicantAttributes, LOAN_TERMS};
pub use validation::validate_application;
