//! Quote provider trait definition.

use async_trait::async_trait;

use crate::models::{AssetKind, Instrument, PriceMap};

/// Trait for external quote providers.
///
/// Implement this trait to add support for a new price source. The
/// aggregator fans out to all registered providers concurrently and merges
/// their maps by `merge_order`.
///
/// `fetch_quotes` is total: network and parse failures for individual
/// lookups are logged and skipped, so a provider always returns a
/// (possibly empty) map and never an error. Quotes with a non-positive
/// price must be dropped before they leave the provider.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier, used for logging and diagnostics.
    fn id(&self) -> &'static str;

    /// Merge position for this provider's quotes.
    ///
    /// The aggregator merges provider maps in ascending order, so a
    /// provider with a higher value overwrites earlier providers on
    /// ticker collisions. Baseline index providers sit low, specialized
    /// live feeds in the middle, the natural-language fallback last.
    fn merge_order(&self) -> u8;

    /// Asset categories this provider owns. A provider must only fetch
    /// for instruments in these categories.
    fn kinds(&self) -> &'static [AssetKind];

    /// Fetch quotes for the instruments relevant to this provider.
    ///
    /// Must return an empty map without touching the network when no
    /// instrument matches the provider's categories.
    async fn fetch_quotes(&self, instruments: &[Instrument]) -> PriceMap;
}
