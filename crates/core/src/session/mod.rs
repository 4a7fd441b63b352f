//! Session orchestration: one identity's holdings collection, its
//! persistence, and the price refresh pipeline.
//!
//! A session owns the holdings exclusively. Mutating operations take
//! `&mut self`, so two refresh cycles (or a refresh racing an edit) cannot
//! overlap by construction; callers sharing a session across tasks wrap it
//! in a lock of their choosing.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};

use portfoliox_market_data::PriceMap;

use crate::errors::{Error, Result};
use crate::holdings::{Holding, HoldingUpdate, HoldingsRepositoryTrait, NewHolding};
use crate::portfolio::{allocation, summarize, CategoryAllocation, PortfolioSummary};
use crate::reconcile;
use crate::refresh::PriceRefreshService;

pub struct Session {
    identity: String,
    holdings: Vec<Holding>,
    repository: Arc<dyn HoldingsRepositoryTrait>,
    refresh_service: PriceRefreshService,
}

impl Session {
    /// Open a session for an identity: load its stored holdings (empty
    /// when none exist) and warm missing current prices from the cache
    /// while the snapshot is still fresh.
    pub async fn load(
        identity: impl Into<String>,
        repository: Arc<dyn HoldingsRepositoryTrait>,
        refresh_service: PriceRefreshService,
    ) -> Result<Self> {
        let identity = identity.into();
        let mut holdings = repository.load(&identity).await?.unwrap_or_default();

        if let Some(cached) = refresh_service.cached_prices().await {
            holdings = reconcile::warm_from_cache(holdings, &cached);
            debug!(
                "session '{}': warmed prices from cache snapshot",
                identity
            );
        }

        Ok(Self {
            identity,
            holdings,
            repository,
            refresh_service,
        })
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Add a holding. The edit is applied in memory first; a failing save
    /// surfaces as an error while the edit is kept, so the caller can
    /// warn about the persistence gap instead of losing the input.
    pub async fn add_holding(&mut self, new: NewHolding) -> Result<&Holding> {
        let holding = new.into_holding()?;
        let index = self.holdings.len();
        self.holdings.push(holding);
        self.persist().await?;
        Ok(&self.holdings[index])
    }

    /// Update an existing holding in place. Same persistence semantics as
    /// [`add_holding`](Self::add_holding).
    pub async fn update_holding(&mut self, id: &str, update: HoldingUpdate) -> Result<&Holding> {
        let position = self
            .holdings
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| Error::HoldingNotFound(id.to_string()))?;

        update.apply(&mut self.holdings[position])?;
        self.persist().await?;
        Ok(&self.holdings[position])
    }

    /// Remove a holding by id.
    pub async fn remove_holding(&mut self, id: &str) -> Result<()> {
        let before = self.holdings.len();
        self.holdings.retain(|h| h.id != id);
        if self.holdings.len() == before {
            return Err(Error::HoldingNotFound(id.to_string()));
        }
        self.persist().await
    }

    /// Run one whole refresh cycle: fan out to providers, merge, cache the
    /// snapshot, apply the merged map atomically onto the collection, and
    /// persist. Returns the merged price map.
    ///
    /// Reconciliation happens once against the complete merged map, never
    /// incrementally as individual providers finish, so observers see an
    /// all-or-nothing transition. If this future is dropped mid-flight,
    /// no partial state has been committed.
    pub async fn refresh_prices(&mut self) -> Result<PriceMap> {
        let prices = self.refresh_service.refresh_all(&self.holdings).await;

        if !prices.is_empty() {
            let holdings = std::mem::take(&mut self.holdings);
            self.holdings = reconcile::apply_quotes(holdings, &prices);
            self.persist().await?;
            debug!(
                "session '{}': refreshed at {}",
                self.identity,
                Utc::now().to_rfc3339()
            );
        } else {
            warn!(
                "session '{}': refresh produced no quotes, holdings unchanged",
                self.identity
            );
        }

        Ok(prices)
    }

    pub fn summary(&self) -> PortfolioSummary {
        summarize(&self.holdings)
    }

    pub fn allocation(&self) -> Vec<CategoryAllocation> {
        allocation(&self.holdings)
    }

    async fn persist(&self) -> Result<()> {
        self.repository.save(&self.identity, &self.holdings).await
    }
}
