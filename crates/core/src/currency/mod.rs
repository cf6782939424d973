//! Exchange rates, the rate table, and conversion.

pub mod amount;
pub mod conversion;
pub mod error;
pub mod rate;
pub mod table;

#[cfg(test)]
mod props;

pub use amount::parse_amount;
pub use conversion::{ConversionResult, RESULT_DECIMAL_PLACES, convert_all, convert_one};
pub use error::RateError;
pub use rate::CurrencyRate;
pub use table::RateTable;
