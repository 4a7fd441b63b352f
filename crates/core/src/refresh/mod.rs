//! Price refresh orchestration.
//!
//! One service owns the aggregator and the cache slot. A refresh cycle is
//! a single awaitable unit: fan out to providers, merge, store the
//! snapshot. Applying the merged map onto holdings is the reconciler's
//! job ([`crate::reconcile::apply_quotes`]), kept separate so callers can
//! refresh and reconcile independently.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};

use portfoliox_market_data::{Instrument, PriceMap, QuoteAggregator};

use crate::holdings::Holding;
use crate::price_cache::{PriceCacheSnapshot, PriceCacheStoreTrait};

/// Service running refresh cycles and maintaining the price cache.
pub struct PriceRefreshService {
    aggregator: QuoteAggregator,
    cache: Arc<dyn PriceCacheStoreTrait>,
}

impl PriceRefreshService {
    pub fn new(aggregator: QuoteAggregator, cache: Arc<dyn PriceCacheStoreTrait>) -> Self {
        Self { aggregator, cache }
    }

    /// Run one refresh cycle for the given holdings and return the merged
    /// price map.
    ///
    /// The snapshot is cached on every refresh that produced quotes. A
    /// cache write failure is logged and swallowed: price data is
    /// reproducible, losing the snapshot costs one extra fetch.
    pub async fn refresh_all(&self, holdings: &[Holding]) -> PriceMap {
        if holdings.is_empty() {
            return PriceMap::new();
        }

        let instruments: Vec<Instrument> =
            holdings.iter().map(Holding::instrument).collect();

        let prices = self.aggregator.refresh(&instruments).await;
        debug!("refresh cycle merged {} quotes", prices.len());

        if !prices.is_empty() {
            let snapshot = PriceCacheSnapshot::capture(prices.clone());
            if let Err(e) = self.cache.store_snapshot(&snapshot).await {
                warn!("price cache write failed: {}", e);
            }
        }

        prices
    }

    /// The cached price map, only while the snapshot is still fresh.
    pub async fn cached_prices(&self) -> Option<PriceMap> {
        match self.cache.load_fresh(Utc::now()).await {
            Ok(snapshot) => snapshot.map(|s| s.prices),
            Err(e) => {
                // Cache miss semantics: unreadable is the same as absent.
                warn!("price cache read failed: {}", e);
                None
            }
        }
    }
}
