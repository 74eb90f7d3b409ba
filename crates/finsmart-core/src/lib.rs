pub mod error;
pub mod presentation;
pub mod time_value;
pub mod types;

#[cfg(feature = "loan")]
pub mod loan;

pub use error::FinsmartError;
pub use types::*;

/// Standard result type for all finsmart operations
pub type FinsmartResult<T> = Result<T, FinsmartError>;
