use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinsmartError {
    #[error("Out of range: {field} — {reason}")]
    OutOfRange { field: String, reason: String },

    #[error("Degenerate term: {term_months} months leaves nothing to amortise over")]
    DegenerateTerm { term_months: i64 },

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl FinsmartError {
    pub(crate) fn out_of_range(field: &str, reason: impl Into<String>) -> Self {
        FinsmartError::OutOfRange {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for the two validation failures a caller should re-prompt on.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FinsmartError::OutOfRange { .. } | FinsmartError::DegenerateTerm { .. }
        )
    }
}

impl From<serde_json::Error> for FinsmartError {
    fn from(e: serde_json::Error) -> Self {
        FinsmartError::SerializationError(e.to_string())
    }
}
