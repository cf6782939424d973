//! Currency error types.

use thiserror::Error;
use xrate_shared::AppError;

/// Errors raised while building rates or converting amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// Currency code is not present in the rate table.
    #[error("Not familiar currency: {0}")]
    UnknownCurrency(String),

    /// Currency code is empty.
    #[error("Currency code is empty")]
    EmptyCode,

    /// Rate must be strictly positive.
    #[error("Rate for {code} must be positive, got {rate}")]
    NonPositiveRate {
        /// Currency code.
        code: String,
        /// Rejected rate.
        rate: String,
    },

    /// Amount text is not a number.
    #[error("Amount is not numeric: {0:?}")]
    InvalidAmount(String),

    /// Result does not fit in a decimal.
    #[error("Amount {0} is out of range for conversion")]
    Overflow(String),
}

impl From<RateError> for AppError {
    fn from(err: RateError) -> Self {
        match err {
            RateError::UnknownCurrency(_) => Self::UnknownCurrency(err.to_string()),
            RateError::InvalidAmount(_) | RateError::EmptyCode => {
                Self::InvalidInput(err.to_string())
            }
            RateError::NonPositiveRate { .. } => Self::Parse(err.to_string()),
            RateError::Overflow(_) => Self::Conversion(err.to_string()),
        }
    }
}
