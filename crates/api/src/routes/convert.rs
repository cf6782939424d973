//! Currency conversion route.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use xrate_core::currency::{ConversionResult, parse_amount};
use xrate_shared::{AppError, AppResult};

use crate::AppState;
use crate::error::ApiError;

/// Amount used when the query has none.
const DEFAULT_AMOUNT: &str = "0";

/// Creates the conversion routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(convert))
}

/// Query parameters for a conversion.
#[derive(Debug, Default, Deserialize)]
pub struct ConvertQuery {
    /// Amount to convert, defaults to 0.
    pub amount: Option<String>,
    /// Currency the amount is expressed in.
    pub currency: Option<String>,
}

impl ConvertQuery {
    /// Parses the amount and checks a currency was given.
    pub fn validate(&self) -> AppResult<(Decimal, &str)> {
        let amount = parse_amount(self.amount.as_deref().unwrap_or(DEFAULT_AMOUNT))?;
        let currency = self
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::InvalidInput("currency is required".into()))?;
        Ok((amount, currency))
    }
}

/// GET `/?amount=<>&currency=<>` - Convert an amount into every known currency.
async fn convert(
    State(state): State<AppState>,
    query: Result<Query<ConvertQuery>, QueryRejection>,
) -> Result<Json<ConversionResult>, ApiError> {
    let Query(query) = query.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let (amount, currency) = query.validate()?;

    info!(%amount, currency, "Converting");
    let result = state.rate_service.convert(amount, currency).await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn query(amount: Option<&str>, currency: Option<&str>) -> ConvertQuery {
        ConvertQuery {
            amount: amount.map(String::from),
            currency: currency.map(String::from),
        }
    }

    #[rstest]
    #[case::plain(Some("100"), Some("USD"), dec!(100), "USD")]
    #[case::default_amount(None, Some("usd"), dec!(0), "usd")]
    #[case::padded(Some(" 2.5 "), Some(" EUR "), dec!(2.5), "EUR")]
    #[case::scientific(Some("1e3"), Some("GBP"), dec!(1000), "GBP")]
    fn test_validate_accepts(
        #[case] amount: Option<&str>,
        #[case] currency: Option<&str>,
        #[case] expected_amount: Decimal,
        #[case] expected_currency: &str,
    ) {
        let query = query(amount, currency);
        let (parsed, code) = query.validate().unwrap();
        assert_eq!(parsed, expected_amount);
        assert_eq!(code, expected_currency);
    }

    #[rstest]
    #[case::missing_currency(Some("100"), None)]
    #[case::blank_currency(Some("100"), Some("  "))]
    #[case::bad_amount(Some("abc"), Some("USD"))]
    #[case::empty_amount(Some(""), Some("USD"))]
    fn test_validate_rejects(#[case] amount: Option<&str>, #[case] currency: Option<&str>) {
        assert!(matches!(
            query(amount, currency).validate(),
            Err(AppError::InvalidInput(_))
        ));
    }
}
