//! Metal price index provider for precious metals.
//!
//! Fetches XAU/XAG/XPT rates from the Metal Price API `/latest` endpoint.
//! The index quotes rates as troy ounces per unit of base currency, so the
//! per-ounce price is the inverse of the rate. Holdings are tracked in
//! grams, so every price is converted via [`TROY_OUNCE_GRAMS`].
//!
//! The free tier occasionally omits silver; when that happens a silver
//! quote is derived from gold via [`GOLD_SILVER_RATIO`]. The index reports
//! no 24h change, so change percentages stay at zero.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::models::{AssetKind, Instrument, PriceMap, Quote};
use crate::provider::{owned_instruments, QuoteProvider};

const BASE_URL: &str = "https://api.metalpriceapi.com/v1";
const PROVIDER_ID: &str = "METAL_INDEX";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Quote currency for all metal lookups.
const QUOTE_CURRENCY: &str = "EUR";

/// Metal symbols requested from the index.
const REQUESTED_METALS: &[&str] = &["XAU", "XAG", "XPT"];

/// Grams per troy ounce. Source quotes are per troy ounce; holdings are
/// tracked per gram.
pub const TROY_OUNCE_GRAMS: Decimal = dec!(31.1035);

/// Long-running gold/silver price ratio, used to derive a silver quote
/// when the index omits a direct one. An approximation; revise here, not
/// in adapter logic.
pub const GOLD_SILVER_RATIO: Decimal = dec!(87);

/// Response from `/latest`.
#[derive(Debug, Deserialize)]
struct MetalRatesResponse {
    success: bool,
    /// 1 unit of base currency = `rate` troy ounces of metal.
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Metal price index provider.
pub struct MetalIndexProvider {
    client: Client,
    api_key: String,
}

impl MetalIndexProvider {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }

    async fn fetch_rates(&self) -> Result<MetalRatesResponse, ProviderError> {
        let url = format!("{}/latest", BASE_URL);
        let currencies = REQUESTED_METALS.join(",");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("base", QUOTE_CURRENCY),
                ("currencies", currencies.as_str()),
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

        let rates: MetalRatesResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::Upstream {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse response: {}", e),
                })?;

        if !rates.success {
            return Err(ProviderError::Upstream {
                provider: PROVIDER_ID.to_string(),
                message: "API reported failure".to_string(),
            });
        }

        Ok(rates)
    }

    /// Per-gram price from an index rate (troy ounces per EUR).
    fn per_gram_price(rate: f64) -> Option<Decimal> {
        let rate = Decimal::try_from(rate).ok()?;
        if rate <= Decimal::ZERO {
            return None;
        }
        Some(Decimal::ONE / rate / TROY_OUNCE_GRAMS)
    }

    /// Normalize index rates into per-gram quotes, deriving silver from
    /// gold when the index omits it.
    fn quotes_from_rates(rates: &HashMap<String, f64>) -> PriceMap {
        let mut quotes = PriceMap::new();

        for symbol in REQUESTED_METALS {
            if let Some(price) = rates.get(*symbol).copied().and_then(Self::per_gram_price) {
                quotes.insert((*symbol).to_string(), Quote::new(price));
            }
        }

        if !quotes.contains_key("XAG") {
            if let Some(gold) = quotes.get("XAU") {
                let derived = gold.price / GOLD_SILVER_RATIO;
                quotes.insert("XAG".to_string(), Quote::new(derived));
            }
        }

        quotes
    }
}

#[async_trait]
impl QuoteProvider for MetalIndexProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn merge_order(&self) -> u8 {
        20
    }

    fn kinds(&self) -> &'static [AssetKind] {
        &[AssetKind::Metal]
    }

    async fn fetch_quotes(&self, instruments: &[Instrument]) -> PriceMap {
        let relevant = owned_instruments(self.kinds(), instruments);
        if relevant.is_empty() {
            return PriceMap::new();
        }

        debug!("MetalIndex: fetching rates for {:?}", REQUESTED_METALS);

        match self.fetch_rates().await {
            Ok(response) => {
                let quotes = Self::quotes_from_rates(&response.rates);
                debug!("MetalIndex: {} quotes", quotes.len());
                quotes
            }
            Err(e) => {
                warn!("MetalIndex: rate fetch failed: {}", e);
                PriceMap::new()
            }
        }
    }
}
