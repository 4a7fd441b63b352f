//! CoinGecko spot index provider for crypto prices.
//!
//! Uses the free `/simple/price` endpoint, which answers one batched call
//! for any number of coin ids. Tickers are CoinGecko ids ("bitcoin",
//! "ethereum") and are used verbatim as provider symbols.
//! API documentation: https://docs.coingecko.com/reference/simple-price

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::models::{AssetKind, Instrument, PriceMap, Quote};
use crate::provider::{owned_instruments, QuoteProvider};

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
const PROVIDER_ID: &str = "COINGECKO";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One coin entry from `/simple/price`.
#[derive(Debug, Deserialize)]
struct CoinEntry {
    /// Price in EUR. Missing when CoinGecko does not know the id.
    eur: Option<f64>,
    /// 24h change percentage in EUR terms.
    #[serde(default)]
    eur_24h_change: Option<f64>,
}

type SimplePriceResponse = HashMap<String, CoinEntry>;

/// CoinGecko spot index provider.
///
/// Needs no API key; the free tier is sufficient for batched spot lookups.
pub struct CoinGeckoProvider {
    client: Client,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// One batched lookup for the given coin ids.
    async fn fetch_simple_price(&self, ids: &str) -> Result<SimplePriceResponse, ProviderError> {
        let url = format!("{}/simple/price", BASE_URL);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ids", ids),
                ("vs_currencies", "eur"),
                ("include_24hr_change", "true"),
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
            .json::<SimplePriceResponse>()
            .await
            .map_err(|e| ProviderError::Upstream {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse response: {}", e),
            })
    }

    /// Normalize the raw response, dropping entries without a positive price.
    fn quotes_from_response(response: SimplePriceResponse) -> PriceMap {
        let mut quotes = PriceMap::new();

        for (id, entry) in response {
            let price = match entry.eur.and_then(|p| Decimal::try_from(p).ok()) {
                Some(p) if p > Decimal::ZERO => p,
                _ => continue,
            };
            let change = entry
                .eur_24h_change
                .and_then(|c| Decimal::try_from(c).ok())
                .unwrap_or(Decimal::ZERO);

            quotes.insert(id, Quote::with_change(price, change));
        }

        quotes
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn merge_order(&self) -> u8 {
        10
    }

    fn kinds(&self) -> &'static [AssetKind] {
        &[AssetKind::Crypto]
    }

    async fn fetch_quotes(&self, instruments: &[Instrument]) -> PriceMap {
        let relevant = owned_instruments(self.kinds(), instruments);
        if relevant.is_empty() {
            return PriceMap::new();
        }

        // Dedup ids; several holdings can share one coin.
        let mut ids: Vec<&str> = relevant.iter().map(|i| i.ticker.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        let ids = ids.join(",");

        debug!("CoinGecko: fetching spot prices for [{}]", ids);

        match self.fetch_simple_price(&ids).await {
            Ok(response) => {
                let quotes = Self::quotes_from_response(response);
                debug!("CoinGecko: {} quotes", quotes.len());
                quotes
            }
            Err(e) => {
                warn!("CoinGecko: spot price fetch failed: {}", e);
                PriceMap::new()
            }
        }
    }
}
