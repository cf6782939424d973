//! Property-based tests for conversion.
//!
//! - Round trip through the base currency recovers the amount
//! - Converting one unit of base currency yields the inverse rates
//! - Every table entry appears in the result, rounded to 3 places

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::conversion::{RESULT_DECIMAL_PLACES, convert_all, round_result};
use super::error::RateError;
use super::rate::CurrencyRate;
use super::table::RateTable;

/// Strategy to generate amounts (0.00 to 1,000,000.00).
fn any_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate exchange rates (0.0100 to 1000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (100i64..10_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn table(usd: Decimal, eur: Decimal, jpy: Decimal) -> RateTable {
    let rates = [("USD", usd), ("EUR", eur), ("JPY", jpy)]
        .into_iter()
        .map(|(code, rate)| CurrencyRate::new(code, rate, format!("test://{code}")).unwrap());
    RateTable::build("NIS", rates)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Converting to the source currency itself lands within rounding
    /// tolerance of the input amount.
    #[test]
    fn prop_source_currency_round_trips(
        amount in any_amount(),
        usd in positive_rate(),
        eur in positive_rate(),
        jpy in positive_rate(),
    ) {
        let table = table(usd, eur, jpy);
        for code in ["USD", "EUR", "JPY", "NIS"] {
            let rate = table.get(code).unwrap().rate_to_base();
            let result = convert_all(amount, code, &table).unwrap();
            let back = result.get(code).unwrap();
            // rounding into base (0.0005 / rate) plus rounding out (0.0005)
            let tolerance = Decimal::new(5, 4) / rate + Decimal::new(11, 4);
            prop_assert!(
                (back - round_result(amount)).abs() <= tolerance,
                "{} {} came back as {}", amount, code, back
            );
        }
    }

    /// One unit of base currency converts to the rounded inverse of each rate.
    #[test]
    fn prop_base_unit_yields_inverse_rates(
        usd in positive_rate(),
        eur in positive_rate(),
        jpy in positive_rate(),
    ) {
        let table = table(usd, eur, jpy);
        let result = convert_all(Decimal::ONE, "NIS", &table).unwrap();
        for rate in table.iter() {
            prop_assert_eq!(
                result.get(rate.code()),
                Some(round_result(Decimal::ONE / rate.rate_to_base()))
            );
        }
    }

    /// The result covers the whole table and never exceeds 3 decimal places.
    #[test]
    fn prop_result_covers_table(
        amount in any_amount(),
        usd in positive_rate(),
        eur in positive_rate(),
        jpy in positive_rate(),
    ) {
        let table = table(usd, eur, jpy);
        let result = convert_all(amount, "EUR", &table).unwrap();
        prop_assert_eq!(result.len(), table.len());
        for (code, value) in result.iter() {
            prop_assert!(table.contains(code));
            prop_assert!(value.scale() <= RESULT_DECIMAL_PLACES);
        }
    }

    /// Codes outside the table are always rejected.
    #[test]
    fn prop_unknown_code_rejected(
        amount in any_amount(),
        code in "[A-Z]{3}".prop_filter("known code", |c| !["USD", "EUR", "JPY", "NIS"].contains(&c.as_str())),
    ) {
        let table = table(Decimal::ONE, Decimal::ONE, Decimal::ONE);
        prop_assert_eq!(
            convert_all(amount, &code, &table),
            Err(RateError::UnknownCurrency(code.clone()))
        );
    }
}
