//! PortfolioX Market Data Crate
//!
//! Provider-agnostic quote fetching for the PortfolioX holdings tracker.
//!
//! # Overview
//!
//! One refresh cycle maps holdings to [`Instrument`]s, fans out to every
//! configured [`QuoteProvider`] concurrently, and merges the returned
//! maps into a single [`PriceMap`] under a fixed precedence order:
//!
//! ```text
//! +------------------+
//! |   Instruments    |  (ticker, name, category)
//! +------------------+
//!          |
//!          v
//! +------------------+     fan-out, per-provider deadline
//! | QuoteAggregator  | --> CoinGecko | MetalIndex | Finnhub | CardIndex | Assistant
//! +------------------+
//!          |
//!          v
//! +------------------+     merge, later provider wins collisions
//! |    PriceMap      |
//! +------------------+
//! ```
//!
//! Providers are fault-isolated: a failing or hanging provider degrades to
//! an empty contribution for the cycle and never fails the refresh.

pub mod aggregator;
pub mod config;
pub mod errors;
pub mod models;
pub mod provider;

// Re-export public types
pub use aggregator::QuoteAggregator;
pub use config::ProviderSettings;
pub use errors::ProviderError;
pub use models::{AssetKind, Instrument, PriceMap, Quote};

// Re-export provider types
pub use provider::assistant::AssistantProvider;
pub use provider::card_index::CardIndexProvider;
pub use provider::coingecko::CoinGeckoProvider;
pub use provider::finnhub::FinnhubProvider;
pub use provider::metals::MetalIndexProvider;
pub use provider::QuoteProvider;
