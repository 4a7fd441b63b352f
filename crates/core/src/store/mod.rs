//! Holdings repository implementations.
//!
//! All of them implement [`HoldingsRepositoryTrait`](crate::holdings::HoldingsRepositoryTrait)
//! and are injectable; nothing in the core reaches for ambient storage.
//! The file store is the local source of truth; the remote document store
//! exists as an optional mirror, composed via [`MirroredHoldingsRepository`].

mod file;
mod memory;
mod mirrored;
mod remote;

pub use file::FileHoldingsRepository;
pub use memory::InMemoryHoldingsRepository;
pub use mirrored::MirroredHoldingsRepository;
pub use remote::RemoteDocumentRepository;
