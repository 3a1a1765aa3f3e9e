//! Envelope ledger state.
//!
//! A pure data holder: the id-keyed envelope table and the monotonic id
//! allocator. No locking and no I/O live here; the store owns those.

mod envelope;
mod state;

pub use envelope::Envelope;
pub use state::LedgerState;
