//! Finnhub quote provider for equities.
//!
//! Uses the `/quote` endpoint, one call per equity, authenticated with a
//! token header. Finnhub free tier is limited to 60 API calls per minute;
//! at portfolio scale the sequential per-symbol loop stays well below it.
//! API documentation: https://finnhub.io/docs/api

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

const BASE_URL: &str = "https://finnhub.io/api/v1";
const PROVIDER_ID: &str = "FINNHUB";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Flat USD -> EUR conversion applied to Finnhub quotes in place of a live
/// FX rate. A deliberate approximation; its error tracks EUR/USD drift and
/// is accepted for this data source.
pub const USD_EUR_CONVERSION: Decimal = dec!(0.92);

/// Response from `/quote`.
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Current price. Finnhub answers 0 for unknown symbols instead of
    /// an error.
    c: Option<f64>,
    /// Percent change since previous close.
    dp: Option<f64>,
}

/// Finnhub equities quote provider.
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
}

impl FinnhubProvider {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }

    /// Fetch and normalize one symbol. `None` when Finnhub does not know
    /// the symbol (zero close).
    async fn fetch_latest_quote(&self, symbol: &str) -> Result<Option<Quote>, ProviderError> {
        let url = format!("{}/quote", BASE_URL);

        let response = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", &self.api_key)
            .query(&[("symbol", symbol)])
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
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ProviderError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::Upstream {
                provider: PROVIDER_ID.to_string(),
                message: "Invalid or missing API key".to_string(),
            });
        }
        if !status.is_success() {
            return Err(ProviderError::Upstream {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let quote: QuoteResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::Upstream {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse quote response: {}", e),
                })?;

        Ok(Self::quote_from_response(&quote))
    }

    /// Normalize a raw quote, applying the flat currency conversion.
    fn quote_from_response(response: &QuoteResponse) -> Option<Quote> {
        let close = response.c.and_then(|c| Decimal::try_from(c).ok())?;
        if close <= Decimal::ZERO {
            return None;
        }

        let change = response
            .dp
            .and_then(|dp| Decimal::try_from(dp).ok())
            .unwrap_or(Decimal::ZERO);

        Some(Quote::with_change(close * USD_EUR_CONVERSION, change))
    }
}

/// Map a portfolio ticker to Finnhub's exchange-suffixed symbol.
/// Unknown tickers pass through verbatim.
fn provider_symbol(ticker: &str) -> &str {
    match ticker {
        "ASML" => "ASML.AS",
        "VWCE" => "VWCE.DE",
        "CSPX" => "CSPX.L",
        other => other,
    }
}

#[async_trait]
impl QuoteProvider for FinnhubProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn merge_order(&self) -> u8 {
        30
    }

    fn kinds(&self) -> &'static [AssetKind] {
        &[AssetKind::Equity]
    }

    async fn fetch_quotes(&self, instruments: &[Instrument]) -> PriceMap {
        let relevant = owned_instruments(self.kinds(), instruments);
        if relevant.is_empty() {
            return PriceMap::new();
        }

        let mut quotes = PriceMap::new();

        // One call per symbol; a failing lookup skips only itself.
        for instrument in relevant {
            let symbol = provider_symbol(&instrument.ticker);
            match self.fetch_latest_quote(symbol).await {
                Ok(Some(quote)) => {
                    quotes.insert(instrument.ticker.clone(), quote);
                }
                Ok(None) => {
                    debug!("Finnhub: no trading data for {}", symbol);
                }
                Err(e) => {
                    warn!("Finnhub: lookup failed for {}: {}", symbol, e);
                }
            }
        }

        debug!("Finnhub: {} quotes", quotes.len());
        quotes
    }
}
