//! Reconciliation of fetched prices onto a holdings collection.
//!
//! Both functions are pure and total: every input holding appears exactly
//! once in the output with its id intact, whatever the price map contains.

use rust_decimal::Decimal;

use portfoliox_market_data::PriceMap;

use crate::holdings::Holding;

/// Apply a refresh cycle's merged price map onto a holdings collection.
///
/// A holding whose ticker maps to a strictly positive quote gets its
/// current price replaced; every other holding passes through untouched.
/// A cycle that omits a ticker never erases a known price.
pub fn apply_quotes(holdings: Vec<Holding>, prices: &PriceMap) -> Vec<Holding> {
    holdings
        .into_iter()
        .map(|mut holding| {
            if let Some(quote) = prices.get(&holding.ticker) {
                if quote.price > Decimal::ZERO {
                    holding.current_price = Some(quote.price);
                }
            }
            holding
        })
        .collect()
}

/// Load-time variant: fill current prices from a cache snapshot, but only
/// for holdings that have none yet. Cached data is never authoritative
/// over a value the holding already carries.
pub fn warm_from_cache(holdings: Vec<Holding>, prices: &PriceMap) -> Vec<Holding> {
    holdings
        .into_iter()
        .map(|mut holding| {
            if holding.current_price.is_none() {
                if let Some(quote) = prices.get(&holding.ticker) {
                    if quote.price > Decimal::ZERO {
                        holding.current_price = Some(quote.price);
                    }
                }
            }
            holding
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfoliox_market_data::{AssetKind, Quote};
    use rust_decimal_macros::dec;

    fn holding(id: &str, ticker: &str, current: Option<Decimal>) -> Holding {
        Holding {
            id: id.to_string(),
            name: ticker.to_string(),
            ticker: ticker.to_string(),
            category: AssetKind::Crypto,
            quantity: dec!(1),
            unit: "units".to_string(),
            buy_price: dec!(100),
            current_price: current,
        }
    }

    fn price_map(entries: &[(&str, Decimal)]) -> PriceMap {
        entries
            .iter()
            .map(|(ticker, price)| (ticker.to_string(), Quote::new(*price)))
            .collect()
    }

    #[test]
    fn test_missing_quote_leaves_price_unchanged() {
        let holdings = vec![holding("a", "bitcoin", Some(dec!(39000)))];
        let updated = apply_quotes(holdings, &price_map(&[("ethereum", dec!(2200))]));

        assert_eq!(updated[0].current_price, Some(dec!(39000)));
    }

    #[test]
    fn test_positive_quote_replaces_price_exactly() {
        let holdings = vec![holding("a", "bitcoin", Some(dec!(39000)))];
        let updated = apply_quotes(holdings, &price_map(&[("bitcoin", dec!(40000.25))]));

        assert_eq!(updated[0].current_price, Some(dec!(40000.25)));
    }

    #[test]
    fn test_non_positive_quote_is_ignored() {
        let holdings = vec![holding("a", "bitcoin", Some(dec!(39000)))];
        let updated = apply_quotes(holdings, &price_map(&[("bitcoin", Decimal::ZERO)]));

        assert_eq!(updated[0].current_price, Some(dec!(39000)));
    }

    #[test]
    fn test_total_and_id_preserving() {
        let holdings = vec![
            holding("a", "bitcoin", None),
            holding("b", "ethereum", Some(dec!(2000))),
            holding("c", "solana", None),
        ];

        let updated = apply_quotes(holdings, &PriceMap::new());
        let ids: Vec<&str> = updated.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let updated = apply_quotes(updated, &price_map(&[("solana", dec!(95))]));
        assert_eq!(updated.len(), 3);
        assert_eq!(updated[2].current_price, Some(dec!(95)));
    }

    #[test]
    fn test_warm_fills_only_missing_prices() {
        let holdings = vec![
            holding("a", "bitcoin", None),
            holding("b", "ethereum", Some(dec!(2000))),
        ];

        let warmed = warm_from_cache(
            holdings,
            &price_map(&[("bitcoin", dec!(40000)), ("ethereum", dec!(2500))]),
        );

        // Absent price filled, existing price untouched.
        assert_eq!(warmed[0].current_price, Some(dec!(40000)));
        assert_eq!(warmed[1].current_price, Some(dec!(2000)));
    }

    #[test]
    fn test_warm_ignores_unknown_tickers() {
        let holdings = vec![holding("a", "bitcoin", None)];
        let warmed = warm_from_cache(holdings, &PriceMap::new());
        assert!(warmed[0].current_price.is_none());
    }
}
