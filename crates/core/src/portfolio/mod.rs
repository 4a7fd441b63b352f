//! Portfolio valuation and allocation.
//!
//! Pure computations over a holdings collection. Holdings without a
//! current market price are valued at their acquisition price.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use portfoliox_market_data::AssetKind;

use crate::holdings::Holding;

/// Whole-portfolio totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_gain: Decimal,
    /// Percentage gain over cost; zero when there is no cost basis.
    pub total_gain_pct: Decimal,
}

/// Valuation of one asset category and its share of the whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAllocation {
    pub category: AssetKind,
    pub value: Decimal,
    pub cost: Decimal,
    pub gain: Decimal,
    pub gain_pct: Decimal,
    /// Share of total portfolio value; zero when the portfolio is empty.
    pub share_pct: Decimal,
    pub positions: usize,
}

/// Compute whole-portfolio totals.
pub fn summarize(holdings: &[Holding]) -> PortfolioSummary {
    let total_value: Decimal = holdings.iter().map(Holding::market_value).sum();
    let total_cost: Decimal = holdings.iter().map(Holding::cost_basis).sum();
    let total_gain = total_value - total_cost;
    let total_gain_pct = if total_cost > Decimal::ZERO {
        total_gain / total_cost * dec!(100)
    } else {
        Decimal::ZERO
    };

    PortfolioSummary {
        total_value,
        total_cost,
        total_gain,
        total_gain_pct,
    }
}

/// Compute per-category valuations. Every category is always present,
/// empty ones with zeros, in [`AssetKind::ALL`] order.
pub fn allocation(holdings: &[Holding]) -> Vec<CategoryAllocation> {
    let total_value: Decimal = holdings.iter().map(Holding::market_value).sum();

    AssetKind::ALL
        .iter()
        .map(|&category| {
            let in_category: Vec<&Holding> = holdings
                .iter()
                .filter(|h| h.category == category)
                .collect();

            let value: Decimal = in_category.iter().map(|h| h.market_value()).sum();
            let cost: Decimal = in_category.iter().map(|h| h.cost_basis()).sum();
            let gain = value - cost;
            let gain_pct = if cost > Decimal::ZERO {
                gain / cost * dec!(100)
            } else {
                Decimal::ZERO
            };
            let share_pct = if total_value > Decimal::ZERO {
                value / total_value * dec!(100)
            } else {
                Decimal::ZERO
            };

            CategoryAllocation {
                category,
                value,
                cost,
                gain,
                gain_pct,
                share_pct,
                positions: in_category.len(),
            }
        })
        .collect()
}
