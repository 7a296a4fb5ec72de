use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LeaseCalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Number of periods must be greater than 0")]
    InvalidPeriods,

    #[error("Cannot calculate rate: derivative is zero (iteration {iteration}, rate {rate})")]
    ZeroDerivative { iteration: u32, rate: Decimal },

    #[error("Rate calculation resulted in invalid value at iteration {iteration}")]
    NonFinite { iteration: u32 },

    #[error("Rate calculation did not converge after {iterations} iterations (delta: {last_delta})")]
    NonConvergent { iterations: u32, last_delta: Decimal },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LeaseCalcError {
    fn from(e: serde_json::Error) -> Self {
        LeaseCalcError::SerializationError(e.to_string())
    }
}
