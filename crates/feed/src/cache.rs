//! Rate table caching using Moka.
//!
//! Off unless `feed.cache_ttl_secs` is set. When on, every lookup within the
//! TTL is served from the same table instead of crawling the sources again.

use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

use xrate_core::currency::RateTable;

/// One table per base currency is all the service ever stores.
const CACHE_CAPACITY: u64 = 4;

/// Cache of built rate tables keyed by base currency code.
#[derive(Clone)]
pub struct RateTableCache {
    cache: Cache<String, Arc<RateTable>>,
}

impl RateTableCache {
    /// Creates a cache whose entries expire `ttl` after insertion.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    /// Cached table for `base`, if still fresh.
    #[must_use]
    pub fn get(&self, base: &str) -> Option<Arc<RateTable>> {
        self.cache.get(base)
    }

    /// Stores `table` under its base currency.
    pub fn insert(&self, table: Arc<RateTable>) {
        self.cache.insert(table.base_currency().to_string(), table);
    }

    /// Drops every cached table.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl std::fmt::Debug for RateTableCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateTableCache")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use xrate_core::currency::CurrencyRate;

    fn table() -> Arc<RateTable> {
        Arc::new(RateTable::build(
            "NIS",
            vec![CurrencyRate::new("USD", dec!(3.459), "u").unwrap()],
        ))
    }

    #[test]
    fn test_get_returns_inserted_table() {
        let cache = RateTableCache::new(Duration::from_secs(60));
        assert!(cache.get("NIS").is_none());

        let table = table();
        cache.insert(Arc::clone(&table));

        let cached = cache.get("NIS").unwrap();
        assert!(Arc::ptr_eq(&cached, &table));
    }

    #[test]
    fn test_invalidate_all() {
        let cache = RateTableCache::new(Duration::from_secs(60));
        cache.insert(table());
        cache.invalidate_all();
        assert!(cache.get("NIS").is_none());
    }

    #[test]
    fn test_entries_expire() {
        let cache = RateTableCache::new(Duration::from_millis(20));
        cache.insert(table());
        std::thread::sleep(Duration::from_millis(60));
        assert!(cache.get("NIS").is_none());
    }
}
