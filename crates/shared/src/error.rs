//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Caller supplied an amount or currency that cannot be used.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested currency is not in the rate table.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// A rate document could not be turned into a rate.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Every configured rate source failed.
    #[error("No rate source available: {0}")]
    SourcesUnavailable(String),

    /// Arithmetic left the representable range.
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// External service error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code used in logs.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            Self::Parse(_) => "PARSE_ERROR",
            Self::SourcesUnavailable(_) => "SOURCES_UNAVAILABLE",
            Self::Conversion(_) => "CONVERSION_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for errors caused by the caller's request rather than the service.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::UnknownCurrency(_))
    }
}
