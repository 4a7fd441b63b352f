//! Holdings module - domain models and persistence traits.

mod holdings_model;
mod holdings_traits;

pub use holdings_model::{Holding, HoldingUpdate, NewHolding};
pub use holdings_traits::HoldingsRepositoryTrait;
