//! Per-request rate table.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::warn;

use super::rate::{CurrencyRate, normalize_code};

/// Mapping from uppercase currency code to its rate against the base currency.
///
/// Always holds exactly one synthetic entry for the base currency with rate 1.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    base: String,
    rates: BTreeMap<String, CurrencyRate>,
}

impl RateTable {
    /// Builds a table from parsed rates plus the base currency entry.
    ///
    /// Rates are taken in iteration order and the first rate seen for a code
    /// wins; later duplicates are dropped. A rate claiming the base currency's
    /// code is dropped as well, so the base entry always stays at exactly 1.
    pub fn build(base_code: &str, rates: impl IntoIterator<Item = CurrencyRate>) -> Self {
        let base = CurrencyRate::base(base_code);
        let base_code = base.code().to_string();

        let mut map = BTreeMap::new();
        map.insert(base_code.clone(), base);

        for rate in rates {
            match map.entry(rate.code().to_string()) {
                Entry::Vacant(slot) => {
                    slot.insert(rate);
                }
                Entry::Occupied(kept) => {
                    warn!(
                        code = %rate.code(),
                        kept_source = %kept.get().source_url(),
                        dropped_source = %rate.source_url(),
                        "Duplicate currency code, keeping first"
                    );
                }
            }
        }

        Self {
            base: base_code,
            rates: map,
        }
    }

    /// Code of the base currency.
    #[must_use]
    pub fn base_currency(&self) -> &str {
        &self.base
    }

    /// Looks up a rate, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&CurrencyRate> {
        self.rates.get(&normalize_code(code))
    }

    /// Returns true if the table has a rate for `code` (case-insensitive).
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Number of entries, base included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if the table has no entries, which a built table never does.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Number of entries read from sources.
    #[must_use]
    pub fn sourced_len(&self) -> usize {
        self.rates.values().filter(|r| !r.is_synthetic()).count()
    }

    /// Entries sorted by code.
    pub fn iter(&self) -> impl Iterator<Item = &CurrencyRate> {
        self.rates.values()
    }

    /// Codes sorted alphabetically.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }
}
