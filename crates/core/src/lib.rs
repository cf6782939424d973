//! Core exchange-rate logic for xrate.
//!
//! This crate contains pure business logic with ZERO web or network dependencies.
//!
//! # Modules
//!
//! - `currency` - Rates, the per-request rate table, and conversion
//! - `source` - Parsing of remote rate documents

pub mod currency;
pub mod source;
