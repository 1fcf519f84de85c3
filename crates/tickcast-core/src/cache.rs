//! In-memory price series cache.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::data_source::PriceSource;
use crate::{PriceSeries, Symbol, ValidationError};

/// Defines how [`PriceCache::get_with_mode`] treats an existing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Serve the stored series if present; otherwise fetch and store. (Default)
    #[default]
    Use,
    /// Always fetch, replacing any stored series.
    Refresh,
}

impl From<bool> for CacheMode {
    fn from(force_refresh: bool) -> Self {
        if force_refresh {
            Self::Refresh
        } else {
            Self::Use
        }
    }
}

/// Keyed store of the most recently fetched series per normalized symbol.
///
/// Entries never expire; staleness is controlled by the caller through
/// `force_refresh`. Stored series are immutable, and a new entry is published
/// with a single insert under the write lock, so readers see either the old
/// or the new series in full. The fetch itself runs without holding the lock.
#[derive(Clone)]
pub struct PriceCache {
    source: Arc<dyn PriceSource>,
    entries: Arc<tokio::sync::RwLock<HashMap<Symbol, PriceSeries>>>,
}

impl PriceCache {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self {
            source,
            entries: Arc::new(tokio::sync::RwLock::new(HashMap::new())),
        }
    }

    /// Get the series for `symbol`, fetching on a miss or when `force_refresh` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySymbol`] if `symbol` is blank.
    pub async fn get(
        &self,
        symbol: &str,
        force_refresh: bool,
    ) -> Result<PriceSeries, ValidationError> {
        self.get_with_mode(symbol, CacheMode::from(force_refresh))
            .await
    }

    pub async fn get_with_mode(
        &self,
        symbol: &str,
        mode: CacheMode,
    ) -> Result<PriceSeries, ValidationError> {
        let symbol = Symbol::parse(symbol)?;
        Ok(self.get_symbol(&symbol, mode).await)
    }

    /// Same as [`PriceCache::get_with_mode`] for an already-normalized symbol.
    pub async fn get_symbol(&self, symbol: &Symbol, mode: CacheMode) -> PriceSeries {
        if mode == CacheMode::Use {
            if let Some(series) = self.entries.read().await.get(symbol) {
                debug!(%symbol, "price cache hit");
                return series.clone();
            }
        }

        debug!(%symbol, ?mode, source = self.source.name(), "price cache fetching");
        let series = self.source.fetch(symbol).await;
        self.entries
            .write()
            .await
            .insert(symbol.clone(), series.clone());
        series
    }

    /// The stored series for `symbol`, without fetching.
    pub async fn peek(&self, symbol: &str) -> Option<PriceSeries> {
        let symbol = Symbol::parse(symbol).ok()?;
        self.entries.read().await.get(&symbol).cloned()
    }

    pub async fn contains(&self, symbol: &str) -> bool {
        self.peek(symbol).await.is_some()
    }

    /// Drop the entry for `symbol`, returning whether one existed.
    pub async fn invalidate(&self, symbol: &str) -> bool {
        match Symbol::parse(symbol) {
            Ok(symbol) => self.entries.write().await.remove(&symbol).is_some(),
            Err(_) => false,
        }
    }

    /// Clear all entries from the cache.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SeriesFuture;
    use crate::{PricePoint, SeriesOrigin};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use time::macros::date;

    /// Returns a series whose single price is the call number.
    #[derive(Debug, Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PriceSource for CountingSource {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn fetch<'a>(&'a self, symbol: &'a Symbol) -> SeriesFuture<'a> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Box::pin(async move {
                PriceSeries::new(
                    symbol.clone(),
                    SeriesOrigin::Live,
                    vec![PricePoint::new(date!(2024 - 01 - 02), call as f64)],
                )
            })
        }
    }

    fn cache() -> (PriceCache, Arc<CountingSource>) {
        let source = Arc::new(CountingSource::default());
        (PriceCache::new(source.clone()), source)
    }

    #[tokio::test]
    async fn test_cache_hit_skips_fetch() {
        let (cache, source) = cache();

        let first = cache.get("AAPL", false).await.expect("valid");
        let second = cache.get("AAPL", false).await.expect("valid");

        assert_eq!(first, second);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_shares_immutable_snapshot() {
        let (cache, _) = cache();

        let first = cache.get("AAPL", false).await.expect("valid");
        let second = cache.get("AAPL", false).await.expect("valid");

        assert!(first.shares_storage_with(&second));
    }

    #[tokio::test]
    async fn test_force_refresh_replaces_entry() {
        let (cache, source) = cache();

        cache.get("AAPL", false).await.expect("valid");
        let refreshed = cache.get("AAPL", true).await.expect("valid");
        let after = cache.get("AAPL", false).await.expect("valid");

        assert_eq!(source.calls(), 2);
        assert_eq!(refreshed.prices(), vec![2.0]);
        assert_eq!(after, refreshed);
    }

    #[tokio::test]
    async fn test_symbol_variants_share_entry() {
        let (cache, source) = cache();

        cache.get("aapl", false).await.expect("valid");
        let upper = cache.get(" AAPL ", false).await.expect("valid");

        assert_eq!(source.calls(), 1);
        assert_eq!(upper.symbol().as_str(), "AAPL");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_blank_symbol_is_rejected_without_fetch() {
        let (cache, source) = cache();

        let error = cache.get("  ", true).await.expect_err("must fail");

        assert_eq!(error, ValidationError::EmptySymbol);
        assert_eq!(source.calls(), 0);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let (cache, source) = cache();

        cache.get("AAPL", false).await.expect("valid");
        cache.get("MSFT", false).await.expect("valid");
        assert!(cache.contains("msft").await);

        assert!(cache.invalidate("aapl").await);
        assert!(!cache.invalidate("aapl").await);
        assert!(cache.peek("AAPL").await.is_none());

        cache.get("AAPL", false).await.expect("valid");
        assert_eq!(source.calls(), 3);

        cache.clear().await;
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_independent_caches_do_not_share_entries() {
        let source = Arc::new(CountingSource::default());
        let first = PriceCache::new(source.clone());
        let second = PriceCache::new(source.clone());

        first.get("AAPL", false).await.expect("valid");
        second.get("AAPL", false).await.expect("valid");

        assert_eq!(source.calls(), 2);
    }

    #[test]
    fn test_cache_mode_from_flag() {
        assert_eq!(CacheMode::from(false), CacheMode::Use);
        assert_eq!(CacheMode::from(true), CacheMode::Refresh);
        assert_eq!(CacheMode::default(), CacheMode::Use);
    }
}
