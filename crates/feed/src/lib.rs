//! Rate feed retrieval and rate table assembly.
//!
//! This crate owns all network I/O:
//! - `fetcher` - concurrent document retrieval with per-fetch timeouts
//! - `service` - the fetch, parse and aggregate pipeline
//! - `cache` - optional time-bounded reuse of built tables

pub mod cache;
pub mod fetcher;
pub mod service;

pub use cache::RateTableCache;
pub use fetcher::{
    DocumentFetcher, FetchBatch, FetchError, FetchLimits, FetchOutcome, HttpFetcher, fetch_all,
};
pub use service::RateService;
