//! Coercion of user-supplied amounts.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::error::RateError;

/// Parses an amount typed by a user.
///
/// Accepts surrounding whitespace, a leading sign, plain decimals and
/// scientific notation (`1e3`).
///
/// Amounts must fit a [`Decimal`]: at most 28 fractional digits and a
/// magnitude below roughly 7.9e28. `1e-30` and `1e30` are rejected rather
/// than rounded.
///
/// # Errors
///
/// Returns `RateError::InvalidAmount` for anything that is not a finite number
/// representable as a `Decimal`.
pub fn parse_amount(text: &str) -> Result<Decimal, RateError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RateError::InvalidAmount(text.to_string()));
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| RateError::InvalidAmount(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("0", dec!(0))]
    #[case("100", dec!(100))]
    #[case("  12.5 ", dec!(12.5))]
    #[case("-3.25", dec!(-3.25))]
    #[case("1e3", dec!(1000))]
    #[case("2.5e-2", dec!(0.025))]
    fn test_parse_amount_accepts(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("abc")]
    #[case("nan")]
    #[case("12abc")]
    #[case("1e30")]
    #[case("1e-30")]
    fn test_parse_amount_rejects(#[case] input: &str) {
        assert_eq!(
            parse_amount(input),
            Err(RateError::InvalidAmount(input.to_string()))
        );
    }
}
