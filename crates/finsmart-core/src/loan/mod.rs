pub mod amortization;
pub mod policy;
pub mod validation;

#[cfg(feature = "schedule")]
pub mod schedule;

#[cfg(feature = "comparison")]
pub mod comparison;

pub use amortization::{
    calculate, compute_loan_estimate, compute_loan_estimate_with, estimate_loan, LoanEstimate,
    LoanEstimateInput,
};
pub use policy::{EngineConfig, PolicyBounds, RoundingMode, DEFAULT_MONTHLY_RATE_PERCENT};
pub use validation::{validate, LoanQuote, ValidatedQuote};
