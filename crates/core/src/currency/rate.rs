//! Currency rate against the base currency.

use std::fmt;

use rust_decimal::Decimal;

use super::error::RateError;

/// One currency's exchange relationship to the base currency.
///
/// `rate_to_base` is the amount of base currency equal to one unit of `code`.
/// Two rates are equal when code, rate and source URL all match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyRate {
    code: String,
    rate_to_base: Decimal,
    source_url: String,
}

impl CurrencyRate {
    /// Creates a rate, normalizing the code to uppercase.
    ///
    /// # Errors
    ///
    /// Returns `RateError::EmptyCode` for a blank code and
    /// `RateError::NonPositiveRate` when the rate is zero or negative.
    pub fn new(
        code: &str,
        rate_to_base: Decimal,
        source_url: impl Into<String>,
    ) -> Result<Self, RateError> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Err(RateError::EmptyCode);
        }
        if rate_to_base <= Decimal::ZERO {
            return Err(RateError::NonPositiveRate {
                code,
                rate: rate_to_base.to_string(),
            });
        }

        Ok(Self {
            code,
            rate_to_base,
            source_url: source_url.into(),
        })
    }

    /// The synthetic entry for the base currency: rate 1, no source.
    #[must_use]
    pub fn base(code: &str) -> Self {
        Self {
            code: normalize_code(code),
            rate_to_base: Decimal::ONE,
            source_url: String::new(),
        }
    }

    /// Uppercase currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Base-currency value of one unit of this currency.
    #[must_use]
    pub const fn rate_to_base(&self) -> Decimal {
        self.rate_to_base
    }

    /// URL the rate was read from, empty for the base entry.
    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// True for an entry that was not read from any source.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.source_url.is_empty()
    }
}

impl fmt::Display for CurrencyRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CurrencyRate<{}, {}, {}>",
            self.code, self.rate_to_base, self.source_url
        )
    }
}

/// Trims and uppercases a currency code.
pub(crate) fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
