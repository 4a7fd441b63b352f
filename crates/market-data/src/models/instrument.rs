use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset category of an instrument.
///
/// Every quote provider owns one or more categories and must only fetch
/// for instruments in the categories it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Crypto,
    Equity,
    Metal,
    Collectible,
}

impl AssetKind {
    /// All categories, in display order.
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Crypto,
        AssetKind::Equity,
        AssetKind::Metal,
        AssetKind::Collectible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Crypto => "crypto",
            AssetKind::Equity => "equity",
            AssetKind::Metal => "metal",
            AssetKind::Collectible => "collectible",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-agnostic lookup parameters for one priced asset.
///
/// Providers receive instruments, never whole holdings. The `ticker` is the
/// key quotes are reported under; `name` is used by providers that search
/// by display name rather than symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    pub ticker: String,
    pub name: String,
    pub kind: AssetKind,
}

impl Instrument {
    pub fn new(ticker: impl Into<String>, name: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AssetKind::Collectible).unwrap(),
            "\"collectible\""
        );
        let kind: AssetKind = serde_json::from_str("\"metal\"").unwrap();
        assert_eq!(kind, AssetKind::Metal);
    }

    #[test]
    fn test_asset_kind_display() {
        assert_eq!(AssetKind::Crypto.to_string(), "crypto");
        assert_eq!(AssetKind::Equity.to_string(), "equity");
    }
}
