//! Shared models for quote fetching.

mod instrument;
mod quote;

pub use instrument::{AssetKind, Instrument};
pub use quote::{PriceMap, Quote};
