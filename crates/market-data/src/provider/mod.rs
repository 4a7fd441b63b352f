//! Quote provider abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteProvider` trait that all providers implement
//! - Concrete provider implementations, one per external data source
//!
//! Providers are fault-isolated by design: each one filters the refresh
//! input down to the asset categories it owns, short-circuits on empty
//! input, and swallows per-lookup failures so a single bad upstream can
//! never fail a refresh cycle. The aggregator only ever sees normalized
//! price maps, never raw provider payloads.

mod traits;

pub mod assistant;
pub mod card_index;
pub mod coingecko;
pub mod finnhub;
pub mod metals;

pub use traits::QuoteProvider;

use crate::models::{AssetKind, Instrument};

/// Filter the refresh input down to the instruments a provider owns.
pub(crate) fn owned_instruments<'a>(
    kinds: &[AssetKind],
    instruments: &'a [Instrument],
) -> Vec<&'a Instrument> {
    instruments
        .iter()
        .filter(|instrument| kinds.contains(&instrument.kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_instruments_filters_by_kind() {
        let instruments = vec![
            Instrument::new("bitcoin", "Bitcoin", AssetKind::Crypto),
            Instrument::new("AAPL", "Apple", AssetKind::Equity),
            Instrument::new("XAU", "Gold", AssetKind::Metal),
        ];

        let owned = owned_instruments(&[AssetKind::Crypto, AssetKind::Metal], &instruments);
        let tickers: Vec<&str> = owned.iter().map(|i| i.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["bitcoin", "XAU"]);
    }

    #[test]
    fn test_owned_instruments_empty_for_unowned_kinds() {
        let instruments = vec![Instrument::new("AAPL", "Apple", AssetKind::Equity)];
        assert!(owned_instruments(&[AssetKind::Collectible], &instruments).is_empty());
    }
}
