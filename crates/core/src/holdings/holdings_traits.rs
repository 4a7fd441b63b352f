use async_trait::async_trait;

use super::holdings_model::Holding;
use crate::errors::Result;

/// Trait defining the contract for per-identity holdings persistence.
///
/// An identity is a plain namespacing key; one holdings collection is
/// stored whole per identity and never shared across identities.
/// Implementations must round-trip every holding field exactly.
#[async_trait]
pub trait HoldingsRepositoryTrait: Send + Sync {
    /// Load the holdings snapshot for an identity. `None` when the
    /// identity has never been saved.
    async fn load(&self, identity: &str) -> Result<Option<Vec<Holding>>>;

    /// Replace the holdings snapshot for an identity.
    async fn save(&self, identity: &str, holdings: &[Holding]) -> Result<()>;
}
