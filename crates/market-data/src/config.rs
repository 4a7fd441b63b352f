//! Provider configuration.

use serde::{Deserialize, Serialize};

/// API credentials for the standard provider set.
///
/// Every key is optional: a provider whose key is absent is simply left
/// out of the aggregator wiring, and the refresh cycle proceeds with the
/// remaining providers. The CoinGecko spot index needs no key.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderSettings {
    pub metal_index_api_key: Option<String>,
    pub finnhub_api_key: Option<String>,
    pub card_index_api_key: Option<String>,
    pub assistant_api_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_deserialize_with_missing_keys() {
        let settings: ProviderSettings =
            serde_json::from_str(r#"{"finnhubApiKey": "abc"}"#).unwrap();
        assert_eq!(settings.finnhub_api_key.as_deref(), Some("abc"));
        assert!(settings.metal_index_api_key.is_none());
        assert!(settings.card_index_api_key.is_none());
        assert!(settings.assistant_api_key.is_none());
    }

    #[test]
    fn test_settings_default_is_empty() {
        let settings = ProviderSettings::default();
        assert!(settings.finnhub_api_key.is_none());
        assert!(settings.assistant_api_key.is_none());
    }
}
