//! Bank of Israel rate document parser.
//!
//! Expected shape:
//!
//! ```xml
//! <CURRENCIES>
//!   <LAST_UPDATE>2020-09-29</LAST_UPDATE>
//!   <CURRENCY>
//!     <NAME>Dollar</NAME>
//!     <UNIT>1</UNIT>
//!     <CURRENCYCODE>USD</CURRENCYCODE>
//!     <COUNTRY>USA</COUNTRY>
//!     <RATE>3.459</RATE>
//!     <CHANGE>-0.231</CHANGE>
//!   </CURRENCY>
//! </CURRENCIES>
//! ```
//!
//! Fields are matched by element name, never by position. Documents must be
//! UTF-8; those that declare a DTD or entities are refused before they reach
//! the XML reader.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::error::ParseError;
use crate::currency::CurrencyRate;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const FORBIDDEN_DECLARATIONS: [&[u8]; 2] = [b"<!DOCTYPE", b"<!ENTITY"];

#[derive(Debug, Deserialize)]
struct XmlCurrencies {
    #[serde(rename = "CURRENCY", default)]
    currencies: Vec<XmlCurrency>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct XmlCurrency {
    #[serde(default)]
    currencycode: Option<String>,
    #[serde(default)]
    rate: Option<String>,
    #[serde(default)]
    unit: Option<String>,
}

/// Parses one rate document into a [`CurrencyRate`] tagged with `source_url`.
///
/// A rate published per `UNIT` units is normalized to a single unit.
///
/// # Errors
///
/// Returns a [`ParseError`] when the document is refused, malformed, or lacks
/// a usable CURRENCYCODE or RATE.
pub fn parse_rate(bytes: &[u8], source_url: &str) -> Result<CurrencyRate, ParseError> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    // Only UTF-8 is accepted, so the declaration scan sees every character.
    // NUL never appears in XML and marks UTF-16 that happens to be valid UTF-8.
    let text = std::str::from_utf8(body)
        .map_err(|e| ParseError::Malformed(format!("document is not UTF-8: {e}")))?;
    if text.contains('\0') {
        return Err(ParseError::Malformed("document contains NUL characters".into()));
    }
    if has_forbidden_declaration(text.as_bytes()) {
        return Err(ParseError::ForbiddenDeclaration);
    }

    let document: XmlCurrencies = serde_xml_rs::from_reader(text.as_bytes())
        .map_err(|e| ParseError::Malformed(e.to_string()))?;

    // Repeated CURRENCY elements must be adjacent; the reader rejects
    // interleaved ones as a duplicate field.
    let mut currencies = document.currencies.into_iter();
    let currency = currencies.next().ok_or(ParseError::MissingCurrency)?;
    let extra = currencies.count();
    if extra > 0 {
        debug!(source_url, extra, "Document has adjacent CURRENCY elements, using the first");
    }

    let code = non_empty(currency.currencycode).ok_or(ParseError::MissingField("CURRENCYCODE"))?;
    let rate_text = non_empty(currency.rate).ok_or(ParseError::MissingField("RATE"))?;
    let rate =
        Decimal::from_str(&rate_text).map_err(|_| ParseError::InvalidRate(rate_text.clone()))?;
    let unit = match non_empty(currency.unit) {
        Some(text) => parse_unit(&text)?,
        None => Decimal::ONE,
    };

    let per_unit = rate
        .checked_div(unit)
        .ok_or_else(|| ParseError::InvalidRate(rate_text.clone()))?;

    Ok(CurrencyRate::new(&code, per_unit, source_url)?)
}

fn parse_unit(text: &str) -> Result<Decimal, ParseError> {
    match Decimal::from_str(text) {
        Ok(unit) if unit > Decimal::ZERO => Ok(unit),
        _ => Err(ParseError::InvalidUnit(text.to_string())),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn has_forbidden_declaration(body: &[u8]) -> bool {
    FORBIDDEN_DECLARATIONS.iter().any(|marker| {
        body.windows(marker.len())
            .any(|window| window.eq_ignore_ascii_case(marker))
    })
}
