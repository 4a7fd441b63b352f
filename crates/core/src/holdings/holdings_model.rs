//! Holding domain models.

use portfoliox_market_data::{AssetKind, Instrument};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_UNIT;
use crate::errors::{Error, Result};

/// One user-owned position in an asset.
///
/// `id` is generated at creation and immutable thereafter. Quantity and
/// acquisition price are always present; the current market price is
/// optional and valuation falls back to the acquisition price while it is
/// unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub name: String,
    /// Provider lookup key (CoinGecko id, exchange symbol, metal code,
    /// card code).
    pub ticker: String,
    pub category: AssetKind,
    pub quantity: Decimal,
    /// Display unit for the quantity ("BTC", "grams", "shares", "cards").
    pub unit: String,
    /// Acquisition price per unit.
    pub buy_price: Decimal,
    /// Last known market price per unit. Absent until a refresh or cache
    /// warm-up supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price: Option<Decimal>,
}

impl Holding {
    /// Price used for valuation: the current market price when known,
    /// the acquisition price otherwise.
    pub fn effective_price(&self) -> Decimal {
        self.current_price.unwrap_or(self.buy_price)
    }

    pub fn market_value(&self) -> Decimal {
        self.quantity * self.effective_price()
    }

    pub fn cost_basis(&self) -> Decimal {
        self.quantity * self.buy_price
    }

    /// Lookup view handed to quote providers.
    pub fn instrument(&self) -> Instrument {
        Instrument::new(self.ticker.clone(), self.name.clone(), self.category)
    }
}

/// Input model for creating a new holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub name: String,
    /// Optional; defaults to a lowercase hyphenated slug of the name.
    #[serde(default)]
    pub ticker: Option<String>,
    pub category: AssetKind,
    pub quantity: Decimal,
    #[serde(default)]
    pub unit: Option<String>,
    pub buy_price: Decimal,
    #[serde(default)]
    pub current_price: Option<Decimal>,
}

impl NewHolding {
    /// Validates the new holding data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(
                "Holding name cannot be empty".to_string(),
            ));
        }
        if self.quantity < Decimal::ZERO {
            return Err(Error::Validation(
                "Quantity cannot be negative".to_string(),
            ));
        }
        if self.buy_price < Decimal::ZERO {
            return Err(Error::Validation(
                "Acquisition price cannot be negative".to_string(),
            ));
        }
        if let Some(price) = self.current_price {
            if price <= Decimal::ZERO {
                return Err(Error::Validation(
                    "Current price must be positive when provided".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Build the holding, generating its id and filling defaults.
    pub fn into_holding(self) -> Result<Holding> {
        self.validate()?;

        let ticker = match self.ticker {
            Some(ticker) if !ticker.trim().is_empty() => ticker,
            _ => ticker_from_name(&self.name),
        };

        Ok(Holding {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            ticker,
            category: self.category,
            quantity: self.quantity,
            unit: self.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            buy_price: self.buy_price,
            current_price: self.current_price,
        })
    }
}

/// Editable fields of an existing holding. Id, name, ticker, and category
/// are immutable after creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HoldingUpdate {
    pub quantity: Option<Decimal>,
    pub buy_price: Option<Decimal>,
    pub current_price: Option<Decimal>,
}

impl HoldingUpdate {
    /// Apply the update in place.
    pub fn apply(&self, holding: &mut Holding) -> Result<()> {
        if let Some(quantity) = self.quantity {
            if quantity < Decimal::ZERO {
                return Err(Error::Validation(
                    "Quantity cannot be negative".to_string(),
                ));
            }
            holding.quantity = quantity;
        }
        if let Some(buy_price) = self.buy_price {
            if buy_price < Decimal::ZERO {
                return Err(Error::Validation(
                    "Acquisition price cannot be negative".to_string(),
                ));
            }
            holding.buy_price = buy_price;
        }
        if let Some(current_price) = self.current_price {
            if current_price <= Decimal::ZERO {
                return Err(Error::Validation(
                    "Current price must be positive when provided".to_string(),
                ));
            }
            holding.current_price = Some(current_price);
        }
        Ok(())
    }
}

/// Lowercase hyphenated slug, used when a new holding names no ticker.
fn ticker_from_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
