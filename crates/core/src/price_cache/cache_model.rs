//! Price cache snapshot model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portfoliox_market_data::PriceMap;

use crate::constants::PRICE_CACHE_TTL_SECS;

/// One cached refresh result: the unified price map and its capture time.
///
/// Written whole on every successful refresh, read once at session start,
/// never partially updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCacheSnapshot {
    pub prices: PriceMap,
    pub captured_at: DateTime<Utc>,
}

impl PriceCacheSnapshot {
    pub fn new(prices: PriceMap, captured_at: DateTime<Utc>) -> Self {
        Self {
            prices,
            captured_at,
        }
    }

    /// Snapshot stamped with the current time.
    pub fn capture(prices: PriceMap) -> Self {
        Self::new(prices, Utc::now())
    }

    /// A snapshot is expired once the TTL has fully elapsed; an expired
    /// snapshot reads as absent.
    pub fn is_expired(&self, at: DateTime<Utc>) -> bool {
        (at - self.captured_at).num_seconds() >= PRICE_CACHE_TTL_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_snapshot_fresh_just_inside_ttl() {
        let captured = Utc::now();
        let snapshot = PriceCacheSnapshot::new(PriceMap::new(), captured);

        // 4min59s after capture: still fresh.
        let at = captured + Duration::seconds(4 * 60 + 59);
        assert!(!snapshot.is_expired(at));
    }

    #[test]
    fn test_snapshot_expired_just_past_ttl() {
        let captured = Utc::now();
        let snapshot = PriceCacheSnapshot::new(PriceMap::new(), captured);

        // 5min01s after capture: expired.
        let at = captured + Duration::seconds(5 * 60 + 1);
        assert!(snapshot.is_expired(at));
    }

    #[test]
    fn test_snapshot_expired_exactly_at_ttl() {
        let captured = Utc::now();
        let snapshot = PriceCacheSnapshot::new(PriceMap::new(), captured);

        let at = captured + Duration::seconds(5 * 60);
        assert!(snapshot.is_expired(at));
    }
}
