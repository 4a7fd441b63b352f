//! Price cache module - snapshot model, store contract, and stores.
//!
//! The cache is one process-wide slot holding the last unified price map.
//! It is deliberately identity-agnostic: price data is not user-specific,
//! only holdings are, so sessions refreshing close in time share the same
//! snapshot instead of refetching.

mod cache_model;
mod cache_store;
mod cache_traits;

pub use cache_model::PriceCacheSnapshot;
pub use cache_store::{FilePriceCache, InMemoryPriceCache};
pub use cache_traits::PriceCacheStoreTrait;
