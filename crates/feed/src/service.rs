//! Rate service: crawl, parse, aggregate, convert.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use xrate_core::currency::{ConversionResult, CurrencyRate, RateTable, convert_all};
use xrate_core::source::parse_rate;
use xrate_shared::{AppError, AppResult, FeedConfig};

use crate::cache::RateTableCache;
use crate::fetcher::{DocumentFetcher, FetchLimits, HttpFetcher, fetch_all, fetch_with_timeout};

/// Builds rate tables from the configured sources and converts over them.
///
/// Without a cache every call crawls the sources again, so each conversion
/// sees the latest published rates.
pub struct RateService {
    fetcher: Arc<dyn DocumentFetcher>,
    sources: Vec<String>,
    base_currency: String,
    limits: FetchLimits,
    cache: Option<RateTableCache>,
}

impl RateService {
    /// Creates a service that fetches through `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, config: &FeedConfig) -> Self {
        Self {
            fetcher,
            sources: config.source_urls(),
            base_currency: config.base_currency.trim().to_uppercase(),
            limits: FetchLimits::from_config(config),
            cache: config.cache_ttl().map(RateTableCache::new),
        }
    }

    /// Creates a service backed by an [`HttpFetcher`].
    ///
    /// # Errors
    ///
    /// Returns `AppError::ExternalService` if the HTTP client cannot be built.
    pub fn from_config(config: &FeedConfig) -> AppResult<Self> {
        let fetcher = HttpFetcher::from_config(config)?;
        Ok(Self::new(Arc::new(fetcher), config))
    }

    /// Code of the base currency.
    #[must_use]
    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    /// Configured source URLs, in priority order.
    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Returns the current rate table.
    ///
    /// Served from the cache when one is configured and still fresh,
    /// otherwise built from a new crawl.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SourcesUnavailable` if sources are configured but
    /// none of them yielded a rate.
    pub async fn load_table(&self) -> AppResult<Arc<RateTable>> {
        if let Some(table) = self.cache.as_ref().and_then(|c| c.get(&self.base_currency)) {
            debug!(base = %self.base_currency, "Rate table cache hit");
            return Ok(table);
        }

        let table = Arc::new(self.build_table().await?);

        if let Some(cache) = &self.cache {
            cache.insert(Arc::clone(&table));
        }
        Ok(table)
    }

    async fn build_table(&self) -> AppResult<RateTable> {
        let batch = fetch_all(self.fetcher.as_ref(), &self.sources, self.limits).await;

        let rates: Vec<CurrencyRate> = batch
            .into_iter()
            .filter_map(|outcome| {
                let body = outcome.result.ok()?;
                match parse_rate(&body, &outcome.url) {
                    Ok(rate) => Some(rate),
                    Err(e) => {
                        warn!(url = %outcome.url, error = %e, "Dropping unparseable rate document");
                        None
                    }
                }
            })
            .collect();

        if rates.is_empty() && !self.sources.is_empty() {
            return Err(AppError::SourcesUnavailable(format!(
                "none of {} configured sources returned a rate",
                self.sources.len()
            )));
        }

        let table = RateTable::build(&self.base_currency, rates);
        info!(
            base = %table.base_currency(),
            currencies = table.len(),
            sourced = table.sourced_len(),
            configured = self.sources.len(),
            "Built rate table"
        );
        Ok(table)
    }

    /// Converts `amount` of `currency` into every currency in a fresh table.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for a blank currency,
    /// `AppError::UnknownCurrency` if no source publishes `currency`, or any
    /// error from [`Self::load_table`].
    pub async fn convert(&self, amount: Decimal, currency: &str) -> AppResult<ConversionResult> {
        if currency.trim().is_empty() {
            return Err(AppError::InvalidInput("currency is required".into()));
        }

        let table = self.load_table().await?;
        Ok(convert_all(amount, currency, &table)?)
    }

    /// Value of one base currency unit in every currency.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load_table`].
    pub async fn base_rates(&self) -> AppResult<ConversionResult> {
        let table = self.load_table().await?;
        Ok(convert_all(Decimal::ONE, &self.base_currency, &table)?)
    }

    /// Re-reads the source of `rate` and returns its current value.
    ///
    /// The base entry has no source and is returned as is.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ExternalService` if the fetch fails and
    /// `AppError::Parse` if the document no longer parses.
    pub async fn refresh(&self, rate: &CurrencyRate) -> AppResult<CurrencyRate> {
        if rate.is_synthetic() {
            return Ok(rate.clone());
        }

        let url = rate.source_url();
        let body = fetch_with_timeout(self.fetcher.as_ref(), url, self.limits.timeout).await?;
        let updated = parse_rate(&body, url)?;
        debug!(code = %updated.code(), rate = %updated.rate_to_base(), "Refreshed rate");
        Ok(updated)
    }
}

impl std::fmt::Debug for RateService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateService")
            .field("sources", &self.sources)
            .field("base_currency", &self.base_currency)
            .field("limits", &self.limits)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
