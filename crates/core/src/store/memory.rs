//! In-memory holdings repository, for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::errors::{Error, Result};
use crate::holdings::{Holding, HoldingsRepositoryTrait};

#[derive(Default)]
pub struct InMemoryHoldingsRepository {
    collections: RwLock<HashMap<String, Vec<Holding>>>,
}

impl InMemoryHoldingsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HoldingsRepositoryTrait for InMemoryHoldingsRepository {
    async fn load(&self, identity: &str) -> Result<Option<Vec<Holding>>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| Error::Storage("holdings lock poisoned".to_string()))?;
        Ok(collections.get(identity).cloned())
    }

    async fn save(&self, identity: &str, holdings: &[Holding]) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| Error::Storage("holdings lock poisoned".to_string()))?;
        collections.insert(identity.to_string(), holdings.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfoliox_market_data::AssetKind;
    use rust_decimal_macros::dec;

    fn holding(id: &str) -> Holding {
        Holding {
            id: id.to_string(),
            name: "Bitcoin".to_string(),
            ticker: "bitcoin".to_string(),
            category: AssetKind::Crypto,
            quantity: dec!(0.45),
            unit: "BTC".to_string(),
            buy_price: dec!(38000),
            current_price: None,
        }
    }

    #[tokio::test]
    async fn test_load_absent_identity() {
        let repo = InMemoryHoldingsRepository::new();
        assert!(repo.load("kevin").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_identities_are_isolated() {
        let repo = InMemoryHoldingsRepository::new();
        repo.save("kevin", &[holding("a")]).await.unwrap();
        repo.save("mike", &[holding("b"), holding("c")]).await.unwrap();

        assert_eq!(repo.load("kevin").await.unwrap().unwrap().len(), 1);
        assert_eq!(repo.load("mike").await.unwrap().unwrap().len(), 2);
        assert!(repo.load("default").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_whole_snapshot() {
        let repo = InMemoryHoldingsRepository::new();
        repo.save("kevin", &[holding("a"), holding("b")]).await.unwrap();
        repo.save("kevin", &[holding("c")]).await.unwrap();

        let loaded = repo.load("kevin").await.unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "c");
    }
}
