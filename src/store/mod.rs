//! The envelope ledger store.
//!
//! Owns the authoritative state, serializes mutations through a FIFO write
//! gate, and persists a full snapshot with atomic write-replace after every
//! successful mutation.

mod durable;
mod errors;
mod snapshot;
mod store;

pub use durable::SnapshotFile;
pub use errors::{StoreError, StoreResult};
pub use snapshot::LedgerSnapshot;
pub use store::{EnvelopePatch, LedgerStore, TransferOutcome};
