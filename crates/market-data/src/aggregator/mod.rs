//! Fan-out aggregation of quote providers.
//!
//! One refresh cycle invokes every registered provider concurrently, bounds
//! each with a deadline, and merges the resulting maps in a fixed
//! precedence order. Providers share no mutable state; the merge happens
//! serially after all fan-out work has completed.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, warn};
use tokio::time::timeout;

use crate::config::ProviderSettings;
use crate::models::{Instrument, PriceMap};
use crate::provider::assistant::AssistantProvider;
use crate::provider::card_index::CardIndexProvider;
use crate::provider::coingecko::CoinGeckoProvider;
use crate::provider::finnhub::FinnhubProvider;
use crate::provider::metals::MetalIndexProvider;
use crate::provider::QuoteProvider;

/// Upper bound on one provider's whole fetch for a cycle. A provider that
/// exceeds it contributes nothing this cycle; the others are unaffected.
const PROVIDER_DEADLINE: Duration = Duration::from_secs(30);

/// Aggregates quotes from all registered providers into one price map per
/// refresh cycle.
///
/// Merge policy: providers are merged in ascending
/// [`merge_order`](QuoteProvider::merge_order), so a later provider
/// overwrites an earlier one for the same ticker. Any subset of providers
/// returning empty maps, including all of them, is a valid cycle, not an
/// error.
pub struct QuoteAggregator {
    providers: Vec<Arc<dyn QuoteProvider>>,
}

impl QuoteAggregator {
    pub fn new(mut providers: Vec<Arc<dyn QuoteProvider>>) -> Self {
        providers.sort_by_key(|provider| provider.merge_order());
        Self { providers }
    }

    /// Wire the standard provider set from settings.
    ///
    /// Providers whose API key is absent are skipped; the spot crypto
    /// index needs no key and is always present.
    pub fn with_default_providers(settings: &ProviderSettings) -> Self {
        let mut providers: Vec<Arc<dyn QuoteProvider>> =
            vec![Arc::new(CoinGeckoProvider::new())];

        if let Some(key) = &settings.metal_index_api_key {
            providers.push(Arc::new(MetalIndexProvider::new(key.clone())));
        }
        if let Some(key) = &settings.finnhub_api_key {
            providers.push(Arc::new(FinnhubProvider::new(key.clone())));
        }
        if let Some(key) = &settings.card_index_api_key {
            providers.push(Arc::new(CardIndexProvider::new(key.clone())));
        }
        if let Some(key) = &settings.assistant_api_key {
            providers.push(Arc::new(AssistantProvider::new(key.clone())));
        }

        Self::new(providers)
    }

    /// Providers in merge order, for diagnostics.
    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Run one refresh cycle: fan out to all providers, join, merge.
    pub async fn refresh(&self, instruments: &[Instrument]) -> PriceMap {
        let fetches = self.providers.iter().map(|provider| {
            let provider = Arc::clone(provider);
            async move {
                match timeout(PROVIDER_DEADLINE, provider.fetch_quotes(instruments)).await {
                    Ok(map) => map,
                    Err(_) => {
                        warn!(
                            "{}: exceeded cycle deadline, dropping its quotes",
                            provider.id()
                        );
                        PriceMap::new()
                    }
                }
            }
        });

        let results = join_all(fetches).await;

        let mut merged = PriceMap::new();
        for (provider, map) in self.providers.iter().zip(results) {
            debug!("{}: merged {} quotes", provider.id(), map.len());
            merged.extend(map);
        }

        merged
    }
}
