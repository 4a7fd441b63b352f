use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::cache_model::PriceCacheSnapshot;
use crate::errors::Result;

/// Trait defining the contract for the process-wide price cache slot.
///
/// Single slot, replaced whole on write, never appended to.
#[async_trait]
pub trait PriceCacheStoreTrait: Send + Sync {
    /// Read the stored snapshot, expired or not. Freshness is the
    /// caller's concern; use [`load_fresh`](Self::load_fresh) for the
    /// TTL-filtered view.
    async fn load_snapshot(&self) -> Result<Option<PriceCacheSnapshot>>;

    /// Replace the slot with a new snapshot.
    async fn store_snapshot(&self, snapshot: &PriceCacheSnapshot) -> Result<()>;

    /// The snapshot if present and still fresh at `now`; expired
    /// snapshots read as absent.
    async fn load_fresh(&self, now: DateTime<Utc>) -> Result<Option<PriceCacheSnapshot>> {
        Ok(self
            .load_snapshot()
            .await?
            .filter(|snapshot| !snapshot.is_expired(now)))
    }
}
