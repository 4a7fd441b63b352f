//! Natural-language batch lookup provider.
//!
//! Covers categories without a structured price feed (equities the live
//! feed misses, collectible cards) by asking a language model with a
//! web search tool for current prices, one batched request per cycle. The
//! reply contract is a strict JSON array of `{"ticker", "price"}` pairs;
//! code fences and any prose around the array are stripped, and anything
//! that still fails strict parsing yields no results rather than an error.
//!
//! This provider merges last, so its quotes win collisions with the
//! structured feeds it overlaps.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::errors::ProviderError;
use crate::models::{AssetKind, Instrument, PriceMap, Quote};
use crate::provider::{owned_instruments, QuoteProvider};

const BASE_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const PROVIDER_ID: &str = "ASSISTANT";
const MODEL: &str = "claude-sonnet-4-20250514";
const MAX_TOKENS: u32 = 1000;

// One batched web-search lookup can take a while; allow more headroom
// than the structured feeds get.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(25);

/// Messages API response, reduced to the text blocks we read.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

/// One `{ticker, price}` pair from the model reply.
#[derive(Debug, Deserialize, PartialEq)]
struct PricePoint {
    ticker: String,
    price: f64,
}

/// Natural-language fallback quote provider.
pub struct AssistantProvider {
    client: Client,
    api_key: String,
}

impl AssistantProvider {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }

    fn build_prompt(instruments: &[&Instrument]) -> String {
        let list = instruments
            .iter()
            .map(|i| format!("- {} ({}), category: {}", i.name, i.ticker, i.kind))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Look up current prices for these assets. Return ONLY a JSON array, \
             no markdown or explanations.\n\
             Format: [{{\"ticker\":\"AAPL\",\"price\":228.50}},...]\n\n\
             Equities: price per share in EUR\n\
             Collectible cards: estimated market value per card in EUR\n\n{}",
            list
        )
    }

    async fn fetch_batch(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = json!({
            "model": MODEL,
            "max_tokens": MAX_TOKENS,
            "tools": [{"type": "web_search_20250305", "name": "web_search"}],
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .client
            .post(BASE_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
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

        let message: MessagesResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::Upstream {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Failed to parse response: {}", e),
                })?;

        Ok(message
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .map(|block| block.text.as_str())
            .collect::<String>())
    }

    /// Strict parse of the model reply.
    ///
    /// Code fences and any wrapping prose outside the outermost `[...]`
    /// are stripped first; the remainder must be a well-formed JSON array
    /// of `{ticker, price}` objects or the whole reply is discarded, with no
    /// partial recovery.
    fn parse_price_list(text: &str) -> Option<Vec<PricePoint>> {
        let cleaned = text.replace("```json", "").replace("```", "");
        let start = cleaned.find('[')?;
        let end = cleaned.rfind(']')?;
        if end < start {
            return None;
        }

        serde_json::from_str::<Vec<PricePoint>>(&cleaned[start..=end]).ok()
    }

    /// Convert parsed pairs into quotes, dropping non-positive prices.
    /// The model reports no change data.
    fn quotes_from_points(points: Vec<PricePoint>) -> PriceMap {
        let mut quotes = PriceMap::new();

        for point in points {
            let price = match Decimal::try_from(point.price) {
                Ok(p) if p > Decimal::ZERO => p,
                _ => continue,
            };
            quotes.insert(point.ticker, Quote::new(price));
        }

        quotes
    }
}

#[async_trait]
impl QuoteProvider for AssistantProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn merge_order(&self) -> u8 {
        50
    }

    fn kinds(&self) -> &'static [AssetKind] {
        &[AssetKind::Equity, AssetKind::Collectible]
    }

    async fn fetch_quotes(&self, instruments: &[Instrument]) -> PriceMap {
        let relevant = owned_instruments(self.kinds(), instruments);
        if relevant.is_empty() {
            return PriceMap::new();
        }

        let prompt = Self::build_prompt(&relevant);

        let text = match self.fetch_batch(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Assistant: batch lookup failed: {}", e);
                return PriceMap::new();
            }
        };

        match Self::parse_price_list(&text) {
            Some(points) => {
                let quotes = Self::quotes_from_points(points);
                debug!("Assistant: {} quotes", quotes.len());
                quotes
            }
            None => {
                warn!("Assistant: reply was not a well-formed price array, discarding");
                PriceMap::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_provider_id_and_kinds() {
        let provider = AssistantProvider::new("test_key".to_string());
        assert_eq!(provider.id(), "ASSISTANT");
        assert_eq!(
            provider.kinds(),
            &[AssetKind::Equity, AssetKind::Collectible]
        );
        assert_eq!(provider.merge_order(), 50);
    }

    #[test]
    fn test_parse_plain_array() {
        let text = r#"[{"ticker":"AAPL","price":228.5},{"ticker":"CZD-1ST","price":1850.0}]"#;
        let points = AssistantProvider::parse_price_list(text).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].ticker, "AAPL");
        assert_eq!(points[0].price, 228.5);
    }

    #[test]
    fn test_parse_strips_code_fences() {
        let text = "```json\n[{\"ticker\":\"AAPL\",\"price\":228.5}]\n```";
        let points = AssistantProvider::parse_price_list(text).unwrap();
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_parse_strips_wrapping_prose() {
        let text = "Here are the prices you asked for:\n\
                    [{\"ticker\":\"NVDA\",\"price\":138.0}]\n\
                    Let me know if you need anything else.";
        let points = AssistantProvider::parse_price_list(text).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].ticker, "NVDA");
    }

    #[test]
    fn test_parse_rejects_malformed_replies() {
        assert!(AssistantProvider::parse_price_list("no prices today").is_none());
        assert!(AssistantProvider::parse_price_list("{\"ticker\":\"AAPL\"}").is_none());
        assert!(AssistantProvider::parse_price_list("[{\"ticker\":\"AAPL\"}]").is_none());
        assert!(AssistantProvider::parse_price_list("[1, 2, 3]").is_none());
        assert!(AssistantProvider::parse_price_list("").is_none());
    }

    #[test]
    fn test_quotes_drop_non_positive_prices() {
        let points = vec![
            PricePoint {
                ticker: "AAPL".to_string(),
                price: 228.5,
            },
            PricePoint {
                ticker: "JUNK".to_string(),
                price: 0.0,
            },
            PricePoint {
                ticker: "WORSE".to_string(),
                price: -5.0,
            },
        ];

        let quotes = AssistantProvider::quotes_from_points(points);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes["AAPL"].price, dec!(228.5));
    }

    #[test]
    fn test_prompt_lists_every_instrument() {
        let instruments = vec![
            Instrument::new("AAPL", "Apple", AssetKind::Equity),
            Instrument::new("CZD-1ST", "Charizard 1st Ed.", AssetKind::Collectible),
        ];
        let refs: Vec<&Instrument> = instruments.iter().collect();

        let prompt = AssistantProvider::build_prompt(&refs);
        assert!(prompt.contains("Apple (AAPL), category: equity"));
        assert!(prompt.contains("Charizard 1st Ed. (CZD-1ST), category: collectible"));
        assert!(prompt.contains("ONLY a JSON array"));
    }

    #[tokio::test]
    async fn test_short_circuits_without_relevant_instruments() {
        let provider = AssistantProvider::new("test_key".to_string());
        let instruments = vec![
            Instrument::new("bitcoin", "Bitcoin", AssetKind::Crypto),
            Instrument::new("XAU", "Gold", AssetKind::Metal),
        ];

        let quotes = provider.fetch_quotes(&instruments).await;
        assert!(quotes.is_empty());
    }
}
