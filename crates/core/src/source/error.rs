//! Rate document parse errors.

use thiserror::Error;
use xrate_shared::AppError;

use crate::currency::RateError;

/// Errors raised while reading a rate document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document carries a DTD or entity declaration.
    #[error("Document declares a DTD or entity, refusing to parse")]
    ForbiddenDeclaration,

    /// Bytes are not a well-formed rate document.
    #[error("Malformed rate document: {0}")]
    Malformed(String),

    /// The document has no CURRENCY element.
    #[error("Document contains no CURRENCY element")]
    MissingCurrency,

    /// A required CURRENCY field is absent or empty.
    #[error("CURRENCY element has no {0}")]
    MissingField(&'static str),

    /// RATE is not a decimal number.
    #[error("Invalid RATE value: {0:?}")]
    InvalidRate(String),

    /// UNIT is not a positive number.
    #[error("Invalid UNIT value: {0:?}")]
    InvalidUnit(String),

    /// Values parsed but do not form a valid rate.
    #[error("Invalid currency record: {0}")]
    InvalidRecord(#[from] RateError),
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err.to_string())
    }
}
