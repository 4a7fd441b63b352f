//! Collectible card marketplace index provider.
//!
//! Searches the TCG marketplace index (via RapidAPI) by card display name,
//! one call per card, and takes the first result's cardmarket price: the
//! 30-day average when present, otherwise the lowest near-mint listing.
//! The index reports no 24h change for cards.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::models::{AssetKind, Instrument, PriceMap, Quote};
use crate::provider::{owned_instruments, QuoteProvider};

const BASE_URL: &str = "https://pokemon-tcg-api.p.rapidapi.com";
const RAPIDAPI_HOST: &str = "pokemon-tcg-api.p.rapidapi.com";
const PROVIDER_ID: &str = "CARD_INDEX";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Response from `/cards`.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Card>,
}

#[derive(Debug, Deserialize)]
struct Card {
    #[serde(default)]
    prices: Option<CardPrices>,
}

#[derive(Debug, Deserialize)]
struct CardPrices {
    #[serde(default)]
    cardmarket: Option<MarketplacePrices>,
}

#[derive(Debug, Deserialize)]
struct MarketplacePrices {
    #[serde(rename = "30d_average")]
    thirty_day_average: Option<f64>,
    lowest_near_mint: Option<f64>,
}

/// Collectible card marketplace index provider.
pub struct CardIndexProvider {
    client: Client,
    api_key: String,
}

impl CardIndexProvider {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }

    /// Search the index by card name and return the top match, if any.
    async fn search_cards(&self, name: &str) -> Result<SearchResponse, ProviderError> {
        let url = format!("{}/cards", BASE_URL);
        let query = urlencoding::encode(name);

        let response = self
            .client
            .get(&url)
            .header("x-rapidapi-host", RAPIDAPI_HOST)
            .header("x-rapidapi-key", &self.api_key)
            .query(&[
                ("search", query.as_ref()),
                ("per_page", "5"),
                ("page", "1"),
                ("sort", "relevance"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    ProviderError::Network(e)
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ProviderError::Upstream {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|e| ProviderError::Upstream {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse search response: {}", e),
            })
    }

    /// Marketplace price of the top search result: 30-day average first,
    /// lowest near-mint as fallback. `None` without a positive price.
    fn market_price(response: &SearchResponse) -> Option<Decimal> {
        let marketplace = response.data.first()?.prices.as_ref()?.cardmarket.as_ref()?;
        let raw = marketplace
            .thirty_day_average
            .filter(|average| *average > 0.0)
            .or(marketplace.lowest_near_mint)?;

        let price = Decimal::try_from(raw).ok()?;
        (price > Decimal::ZERO).then_some(price)
    }
}

#[async_trait]
impl QuoteProvider for CardIndexProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn merge_order(&self) -> u8 {
        40
    }

    fn kinds(&self) -> &'static [AssetKind] {
        &[AssetKind::Collectible]
    }

    async fn fetch_quotes(&self, instruments: &[Instrument]) -> PriceMap {
        let relevant = owned_instruments(self.kinds(), instruments);
        if relevant.is_empty() {
            return PriceMap::new();
        }

        let mut quotes = PriceMap::new();

        for instrument in relevant {
            match self.search_cards(&instrument.name).await {
                Ok(response) => match Self::market_price(&response) {
                    Some(price) => {
                        quotes.insert(instrument.ticker.clone(), Quote::new(price));
                    }
                    None => {
                        debug!("CardIndex: no marketplace price for '{}'", instrument.name);
                    }
                },
                Err(e) => {
                    warn!("CardIndex: search failed for '{}': {}", instrument.name, e);
                }
            }
        }

        debug!("CardIndex: {} quotes", quotes.len());
        quotes
    }
}
