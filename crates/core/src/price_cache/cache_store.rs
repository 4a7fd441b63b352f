//! Price cache store implementations.

use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use log::debug;

use super::cache_model::PriceCacheSnapshot;
use super::cache_traits::PriceCacheStoreTrait;
use crate::errors::{Error, Result};

/// In-memory cache slot, for tests and ephemeral sessions.
#[derive(Default)]
pub struct InMemoryPriceCache {
    slot: RwLock<Option<PriceCacheSnapshot>>,
}

impl InMemoryPriceCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PriceCacheStoreTrait for InMemoryPriceCache {
    async fn load_snapshot(&self) -> Result<Option<PriceCacheSnapshot>> {
        let slot = self
            .slot
            .read()
            .map_err(|_| Error::Storage("price cache lock poisoned".to_string()))?;
        Ok(slot.clone())
    }

    async fn store_snapshot(&self, snapshot: &PriceCacheSnapshot) -> Result<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| Error::Storage("price cache lock poisoned".to_string()))?;
        *slot = Some(snapshot.clone());
        Ok(())
    }
}

/// Durable cache slot backed by a single JSON file.
pub struct FilePriceCache {
    path: PathBuf,
}

impl FilePriceCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PriceCacheStoreTrait for FilePriceCache {
    async fn load_snapshot(&self) -> Result<Option<PriceCacheSnapshot>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot = serde_json::from_str(&raw)?;
        Ok(Some(snapshot))
    }

    async fn store_snapshot(&self, snapshot: &PriceCacheSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let raw = serde_json::to_string(snapshot)?;
        std::fs::write(&self.path, raw)?;
        debug!(
            "price cache: stored {} quotes at {}",
            snapshot.prices.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use portfoliox_market_data::{PriceMap, Quote};
    use rust_decimal_macros::dec;

    fn sample_snapshot() -> PriceCacheSnapshot {
        let mut prices = PriceMap::new();
        prices.insert("bitcoin".to_string(), Quote::with_change(dec!(40000), dec!(1.2)));
        prices.insert("XAU".to_string(), Quote::new(dec!(88.5)));
        PriceCacheSnapshot::capture(prices)
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let cache = InMemoryPriceCache::new();
        assert!(cache.load_snapshot().await.unwrap().is_none());

        let snapshot = sample_snapshot();
        cache.store_snapshot(&snapshot).await.unwrap();
        assert_eq!(cache.load_snapshot().await.unwrap(), Some(snapshot));
    }

    #[tokio::test]
    async fn test_store_replaces_prior_snapshot() {
        let cache = InMemoryPriceCache::new();
        cache.store_snapshot(&sample_snapshot()).await.unwrap();

        let replacement = PriceCacheSnapshot::capture(PriceMap::new());
        cache.store_snapshot(&replacement).await.unwrap();

        let loaded = cache.load_snapshot().await.unwrap().unwrap();
        assert!(loaded.prices.is_empty());
    }

    #[tokio::test]
    async fn test_load_fresh_filters_expired_snapshots() {
        let cache = InMemoryPriceCache::new();
        let snapshot = sample_snapshot();
        cache.store_snapshot(&snapshot).await.unwrap();

        let just_inside = snapshot.captured_at + Duration::seconds(4 * 60 + 59);
        assert!(cache.load_fresh(just_inside).await.unwrap().is_some());

        let just_past = snapshot.captured_at + Duration::seconds(5 * 60 + 1);
        assert!(cache.load_fresh(just_past).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FilePriceCache::new(dir.path().join("price_cache.json"));

        assert!(cache.load_snapshot().await.unwrap().is_none());

        let snapshot = sample_snapshot();
        cache.store_snapshot(&snapshot).await.unwrap();

        let loaded = cache.load_snapshot().await.unwrap().unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("price_cache.json");
        let snapshot = sample_snapshot();

        FilePriceCache::new(&path)
            .store_snapshot(&snapshot)
            .await
            .unwrap();

        let reopened = FilePriceCache::new(&path);
        assert_eq!(reopened.load_snapshot().await.unwrap(), Some(snapshot));
    }

    #[tokio::test]
    async fn test_file_store_is_identity_agnostic_single_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("price_cache.json");

        let first = sample_snapshot();
        FilePriceCache::new(&path)
            .store_snapshot(&first)
            .await
            .unwrap();

        let mut prices = PriceMap::new();
        prices.insert("ethereum".to_string(), Quote::new(dec!(2200)));
        let second = PriceCacheSnapshot::new(prices, Utc::now());
        FilePriceCache::new(&path)
            .store_snapshot(&second)
            .await
            .unwrap();

        let loaded = FilePriceCache::new(&path).load_snapshot().await.unwrap().unwrap();
        assert_eq!(loaded.prices.len(), 1);
        assert!(loaded.prices.contains_key("ethereum"));
    }
}
