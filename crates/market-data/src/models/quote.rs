use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One provider's price reading for one ticker at refresh time.
///
/// Quotes are ephemeral: they live in the price map of a single refresh
/// cycle and in the cache snapshot, never as standalone records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Price per unit in EUR. Strictly positive once past the provider
    /// boundary; adapters drop anything else.
    pub price: Decimal,

    /// 24-hour change percentage. Zero when the source does not report it.
    #[serde(default)]
    pub change_24h: Decimal,
}

impl Quote {
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            change_24h: Decimal::ZERO,
        }
    }

    pub fn with_change(price: Decimal, change_24h: Decimal) -> Self {
        Self { price, change_24h }
    }

    /// A quote is usable only with a strictly positive price.
    pub fn is_valid(&self) -> bool {
        self.price > Decimal::ZERO
    }
}

/// Ticker -> quote mapping, produced fresh each refresh cycle.
pub type PriceMap = HashMap<String, Quote>;
