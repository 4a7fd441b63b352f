//! Local-first mirrored holdings repository.
//!
//! Saves must land locally; the remote mirror is best-effort and its
//! failures are logged, never surfaced. Loads prefer local and fall back
//! to the remote copy, backfilling local so the next load is served
//! without a network round-trip.

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;

use crate::errors::Result;
use crate::holdings::{Holding, HoldingsRepositoryTrait};

pub struct MirroredHoldingsRepository {
    local: Arc<dyn HoldingsRepositoryTrait>,
    remote: Arc<dyn HoldingsRepositoryTrait>,
}

impl MirroredHoldingsRepository {
    pub fn new(
        local: Arc<dyn HoldingsRepositoryTrait>,
        remote: Arc<dyn HoldingsRepositoryTrait>,
    ) -> Self {
        Self { local, remote }
    }
}

#[async_trait]
impl HoldingsRepositoryTrait for MirroredHoldingsRepository {
    async fn load(&self, identity: &str) -> Result<Option<Vec<Holding>>> {
        if let Some(holdings) = self.local.load(identity).await? {
            return Ok(Some(holdings));
        }

        match self.remote.load(identity).await {
            Ok(Some(holdings)) => {
                if let Err(e) = self.local.save(identity, &holdings).await {
                    warn!("mirror: local backfill failed for '{}': {}", identity, e);
                }
                Ok(Some(holdings))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                warn!("mirror: remote load failed for '{}': {}", identity, e);
                Ok(None)
            }
        }
    }

    async fn save(&self, identity: &str, holdings: &[Holding]) -> Result<()> {
        self.local.save(identity, holdings).await?;

        if let Err(e) = self.remote.save(identity, holdings).await {
            warn!("mirror: remote save failed for '{}': {}", identity, e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfoliox_market_data::AssetKind;
    use rust_decimal_macros::dec;

    use crate::errors::Error;
    use crate::store::InMemoryHoldingsRepository;

    struct FailingRepository;

    #[async_trait]
    impl HoldingsRepositoryTrait for FailingRepository {
        async fn load(&self, _identity: &str) -> Result<Option<Vec<Holding>>> {
            Err(Error::RemoteStore("unreachable".to_string()))
        }

        async fn save(&self, _identity: &str, _holdings: &[Holding]) -> Result<()> {
            Err(Error::RemoteStore("unreachable".to_string()))
        }
    }

    fn holding(id: &str) -> Holding {
        Holding {
            id: id.to_string(),
            name: "Gold".to_string(),
            ticker: "XAU".to_string(),
            category: AssetKind::Metal,
            quantity: dec!(50),
            unit: "grams".to_string(),
            buy_price: dec!(58),
            current_price: None,
        }
    }

    #[tokio::test]
    async fn test_save_mirrors_to_both_sides() {
        let local = Arc::new(InMemoryHoldingsRepository::new());
        let remote = Arc::new(InMemoryHoldingsRepository::new());
        let mirrored = MirroredHoldingsRepository::new(local.clone(), remote.clone());

        mirrored.save("kevin", &[holding("a")]).await.unwrap();

        assert!(local.load("kevin").await.unwrap().is_some());
        assert!(remote.load("kevin").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_remote_save_failure_is_swallowed() {
        let local = Arc::new(InMemoryHoldingsRepository::new());
        let mirrored =
            MirroredHoldingsRepository::new(local.clone(), Arc::new(FailingRepository));

        mirrored.save("kevin", &[holding("a")]).await.unwrap();
        assert!(local.load("kevin").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_load_falls_back_to_remote_and_backfills() {
        let local = Arc::new(InMemoryHoldingsRepository::new());
        let remote = Arc::new(InMemoryHoldingsRepository::new());
        remote.save("kevin", &[holding("a")]).await.unwrap();

        let mirrored = MirroredHoldingsRepository::new(local.clone(), remote);
        let loaded = mirrored.load("kevin").await.unwrap().unwrap();
        assert_eq!(loaded[0].id, "a");

        // Next load is served locally.
        assert_eq!(local.load("kevin").await.unwrap().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remote_load_failure_reads_as_absent() {
        let local = Arc::new(InMemoryHoldingsRepository::new());
        let mirrored = MirroredHoldingsRepository::new(local, Arc::new(FailingRepository));

        assert!(mirrored.load("kevin").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_local_failure_propagates() {
        let remote = Arc::new(InMemoryHoldingsRepository::new());
        let mirrored = MirroredHoldingsRepository::new(Arc::new(FailingRepository), remote);

        assert!(mirrored.save("kevin", &[holding("a")]).await.is_err());
    }
}
