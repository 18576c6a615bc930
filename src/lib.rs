pub mod advice;
pub mod applicant;
pub mod config;
pub mod credentials;
pub mod doctor;
pub mod eligibility;
pub mod output;
pub mod telemetry;
