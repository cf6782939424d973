//! Currency conversion logic.
//!
//! Rounding strategy:
//! - Every published amount is rounded to 3 decimal places
//! - Banker's rounding (round half to even)
//! - The amount is first converted into the base currency, rounded, and then
//!   fanned out to every currency in the table

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::error::RateError;
use super::rate::normalize_code;
use super::table::RateTable;

/// Decimal places of every converted amount.
pub const RESULT_DECIMAL_PLACES: u32 = 3;

/// Rounds a converted amount with banker's rounding.
#[must_use]
pub fn round_result(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(RESULT_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven)
}

/// Converts `amount` of `source_code` into the base currency.
///
/// # Errors
///
/// Returns `RateError::UnknownCurrency` if `source_code` is not in `table`
/// and `RateError::Overflow` if the product does not fit in a decimal.
pub fn convert_one(
    amount: Decimal,
    source_code: &str,
    table: &RateTable,
) -> Result<Decimal, RateError> {
    let rate = table
        .get(source_code)
        .ok_or_else(|| RateError::UnknownCurrency(normalize_code(source_code)))?;

    amount
        .checked_mul(rate.rate_to_base())
        .map(round_result)
        .ok_or_else(|| RateError::Overflow(amount.to_string()))
}

/// Converts `amount` of `source_code` into every currency in `table`.
///
/// The result covers the source currency itself and the base currency.
///
/// # Errors
///
/// Same as [`convert_one`].
pub fn convert_all(
    amount: Decimal,
    source_code: &str,
    table: &RateTable,
) -> Result<ConversionResult, RateError> {
    let amount_in_base = convert_one(amount, source_code, table)?;

    let amounts = table
        .iter()
        .map(|rate| {
            amount_in_base
                .checked_div(rate.rate_to_base())
                .map(|converted| (rate.code().to_string(), round_result(converted)))
                .ok_or_else(|| RateError::Overflow(amount.to_string()))
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    Ok(ConversionResult { amounts })
}

/// Converted amounts keyed by currency code.
///
/// Serializes as a JSON object of numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionResult {
    amounts: BTreeMap<String, Decimal>,
}

impl ConversionResult {
    /// Amount for `code` (case-insensitive).
    #[must_use]
    pub fn get(&self, code: &str) -> Option<Decimal> {
        self.amounts.get(&normalize_code(code)).copied()
    }

    /// Number of currencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    /// Returns true if there are no amounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Amounts sorted by code.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.amounts.iter().map(|(code, amount)| (code.as_str(), *amount))
    }
}

impl Serialize for ConversionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.amounts.len()))?;
        for (code, amount) in &self.amounts {
            map.serialize_entry(code, &amount.to_f64().unwrap_or_default())?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::rate::CurrencyRate;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn usd_table() -> RateTable {
        RateTable::build(
            "NIS",
            vec![CurrencyRate::new("USD", dec!(3.459), "http://feed/usd").unwrap()],
        )
    }

    fn three_source_table() -> RateTable {
        RateTable::build(
            "NIS",
            vec![
                CurrencyRate::new("USD", dec!(3.459), "u").unwrap(),
                CurrencyRate::new("GBP", dec!(4.4), "g").unwrap(),
                CurrencyRate::new("EUR", dec!(4.0), "e").unwrap(),
            ],
        )
    }

    #[test]
    fn test_convert_one_to_base() {
        // 100 USD * 3.459 = 345.9 NIS
        let result = convert_one(dec!(100), "USD", &usd_table()).unwrap();
        assert_eq!(result, dec!(345.9));
    }

    #[test]
    fn test_convert_one_rounds_to_3_decimals() {
        // 1.2345 USD * 3.459 = 4.2701355 -> 4.270
        let result = convert_one(dec!(1.2345), "usd", &usd_table()).unwrap();
        assert_eq!(result, dec!(4.270));
    }

    #[test]
    fn test_convert_all_from_base() {
        let result = convert_all(dec!(1), "NIS", &usd_table()).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.get("USD"), Some(dec!(0.289)));
        assert_eq!(result.get("NIS"), Some(dec!(1)));
    }

    #[test]
    fn test_convert_all_round_trips_source_currency() {
        let result = convert_all(dec!(100), "usd", &three_source_table()).unwrap();

        assert_eq!(result.get("USD"), Some(dec!(100)));
        assert_eq!(result.get("NIS"), Some(dec!(345.9)));
        // 345.9 / 4.4 = 78.613636... -> 78.614
        assert_eq!(result.get("GBP"), Some(dec!(78.614)));
        // 345.9 / 4.0 = 86.475 exactly, no midpoint at the 3rd place
        assert_eq!(result.get("EUR"), Some(dec!(86.475)));
    }

    #[test]
    fn test_convert_zero_amount() {
        let result = convert_all(Decimal::ZERO, "EUR", &three_source_table()).unwrap();
        assert!(result.iter().all(|(_, amount)| amount.is_zero()));
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_unknown_currency() {
        let table = usd_table();
        assert_eq!(
            convert_one(dec!(1), "xyz", &table),
            Err(RateError::UnknownCurrency("XYZ".into()))
        );
        assert_eq!(
            convert_all(dec!(1), "JPY", &table),
            Err(RateError::UnknownCurrency("JPY".into()))
        );
    }

    #[test]
    fn test_overflow_is_an_error() {
        let result = convert_one(Decimal::MAX, "USD", &usd_table());
        assert!(matches!(result, Err(RateError::Overflow(_))));
    }

    #[test]
    fn test_bankers_rounding() {
        assert_eq!(round_result(dec!(0.0025)), dec!(0.002));
        assert_eq!(round_result(dec!(0.0035)), dec!(0.004));
    }

    #[test]
    fn test_serializes_as_json_numbers() {
        let result = convert_all(dec!(1), "NIS", &usd_table()).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"NIS": 1.0, "USD": 0.289}));
    }
}
