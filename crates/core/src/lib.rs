//! PortfolioX Core - holdings domain, reconciliation, and storage.
//!
//! This crate contains the business logic for the PortfolioX holdings
//! tracker: the holding model and its per-identity persistence, the price
//! cache, the reconciliation of fetched prices onto holdings, portfolio
//! valuation, and the session orchestrator tying one identity's state to
//! the refresh pipeline from `portfoliox-market-data`.
//!
//! The embedded-library surface consumed by a presentation layer is:
//! [`refresh::PriceRefreshService::refresh_all`] for one refresh cycle
//! and [`reconcile::apply_quotes`] for applying its result, with
//! [`session::Session`] as the convenience orchestrator over both.

pub mod constants;
pub mod errors;
pub mod holdings;
pub mod portfolio;
pub mod price_cache;
pub mod reconcile;
pub mod refresh;
pub mod session;
pub mod store;

// Re-export common types
pub use errors::{Error, Result};
pub use holdings::{Holding, HoldingUpdate, HoldingsRepositoryTrait, NewHolding};
pub use portfolio::{CategoryAllocation, PortfolioSummary};
pub use price_cache::{
    FilePriceCache, InMemoryPriceCache, PriceCacheSnapshot, PriceCacheStoreTrait,
};
pub use refresh::PriceRefreshService;
pub use session::Session;
pub use store::{
    FileHoldingsRepository, InMemoryHoldingsRepository, MirroredHoldingsRepository,
    RemoteDocumentRepository,
};
