use thiserror::Error;

#[derive(Debug, Error)]
pub enum DealError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DealError {
    /// ARV must be strictly positive before any offer or score is computed.
    pub(crate) fn non_positive_arv(arv: rust_decimal::Decimal) -> Self {
        DealError::InvalidInput {
            field: "arv".into(),
            reason: format!("ARV must be positive to compute an offer (got {arv})"),
        }
    }

    /// A figure derived from `field` does not fit in a 96-bit decimal.
    pub(crate) fn out_of_range(field: &str) -> Self {
        DealError::InvalidInput {
            field: field.into(),
            reason: "Value is too large to compute with".into(),
        }
    }
}

impl From<serde_json::Error> for DealError {
    fn from(e: serde_json::Error) -> Self {
        DealError::SerializationError(e.to_string())
    }
}
