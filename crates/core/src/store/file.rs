//! File-backed holdings repository.
//!
//! One JSON file per identity under a data directory. Decimal fields are
//! serialized in string form, so every numeric field round-trips exactly.

use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;

use crate::errors::Result;
use crate::holdings::{Holding, HoldingsRepositoryTrait};

pub struct FileHoldingsRepository {
    dir: PathBuf,
}

impl FileHoldingsRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, identity: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_identity(identity)))
    }
}

/// Reduce an identity to a filesystem-safe file stem. Anything outside
/// `[A-Za-z0-9._-]` becomes an underscore; an empty result maps to "_".
fn sanitize_identity(identity: &str) -> String {
    let sanitized: String = identity
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}

#[async_trait]
impl HoldingsRepositoryTrait for FileHoldingsRepository {
    async fn load(&self, identity: &str) -> Result<Option<Vec<Holding>>> {
        let path = self.path_for(identity);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let holdings = serde_json::from_str(&raw)?;
        Ok(Some(holdings))
    }

    async fn save(&self, identity: &str, holdings: &[Holding]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path_for(identity);
        let raw = serde_json::to_string_pretty(holdings)?;
        std::fs::write(&path, raw)?;
        debug!(
            "holdings: saved {} positions for '{}' to {}",
            holdings.len(),
            identity,
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfoliox_market_data::AssetKind;
    use rust_decimal_macros::dec;

    fn holding() -> Holding {
        Holding {
            id: "s1".to_string(),
            name: "Bitcoin".to_string(),
            ticker: "bitcoin".to_string(),
            category: AssetKind::Crypto,
            quantity: dec!(0.123456789012345678),
            unit: "BTC".to_string(),
            buy_price: dec!(38000.01),
            current_price: Some(dec!(40123.456789)),
        }
    }

    #[test]
    fn test_sanitize_identity() {
        assert_eq!(sanitize_identity("kevin"), "kevin");
        assert_eq!(sanitize_identity("kevin-2"), "kevin-2");
        assert_eq!(sanitize_identity("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_identity(""), "_");
    }

    #[tokio::test]
    async fn test_round_trip_preserves_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileHoldingsRepository::new(dir.path());

        let original = vec![holding()];
        repo.save("kevin", &original).await.unwrap();

        let loaded = repo.load("kevin").await.unwrap().unwrap();
        assert_eq!(loaded, original);
    }

    #[tokio::test]
    async fn test_absent_identity_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileHoldingsRepository::new(dir.path());
        assert!(repo.load("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_identities_use_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileHoldingsRepository::new(dir.path());

        repo.save("kevin", &[holding()]).await.unwrap();
        repo.save("mike", &[]).await.unwrap();

        assert_eq!(repo.load("kevin").await.unwrap().unwrap().len(), 1);
        assert_eq!(repo.load("mike").await.unwrap().unwrap().len(), 0);
    }
}
