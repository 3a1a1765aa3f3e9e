//! The ledger store: serialized mutations over in-memory state, with a
//! durable snapshot rewritten after every successful change.
//!
//! Concurrency discipline:
//! - Mutations funnel through one FIFO write gate and run one at a time,
//!   in arrival order, for the whole of mutate-then-persist.
//! - Each mutation applies its entire delta under a single state write
//!   lock, so readers never observe a transfer with only one leg applied.
//! - Reads take the state lock directly and do not wait for the durable
//!   write step.

use std::path::Path;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use crate::ledger::{Envelope, LedgerState};
use crate::observability::Logger;

use super::durable::SnapshotFile;
use super::errors::{StoreError, StoreResult};
use super::snapshot::LedgerSnapshot;

/// Optional field updates for [`LedgerStore::update`].
#[derive(Debug, Clone, Default)]
pub struct EnvelopePatch {
    pub name: Option<String>,
    pub balance_cents: Option<i64>,
}

/// Both sides of a completed transfer, post-mutation.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub from: Envelope,
    pub to: Envelope,
}

/// The envelope ledger store.
pub struct LedgerStore {
    /// Committed state. Write-locked only for in-memory deltas.
    state: RwLock<LedgerState>,

    /// FIFO write gate. Held across mutate-then-persist, so the total
    /// order of mutations is the order callers reached the gate.
    write_gate: Mutex<()>,

    /// Durable snapshot, rewritten after every successful mutation.
    snapshot_file: SnapshotFile,
}

impl LedgerStore {
    /// Open the store at `path`, loading the existing snapshot or seeding
    /// and persisting the default data set before accepting operations.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotLoad` if the file exists but cannot be parsed, and
    /// `SnapshotWrite` if the initial seed cannot be persisted. Both are
    /// fatal to startup.
    pub fn initialize(path: &Path) -> StoreResult<Self> {
        let snapshot_file = SnapshotFile::new(path);
        snapshot_file.ensure_parent_dir()?;

        let state = if snapshot_file.exists() {
            let snapshot = snapshot_file.read()?;
            let path_str = snapshot_file.path().display().to_string();
            let count = snapshot.envelopes.len().to_string();
            Logger::info(
                "snapshot_loaded",
                &[("path", path_str.as_str()), ("envelopes", count.as_str())],
            );
            snapshot.into_state()
        } else {
            let seed = LedgerSnapshot::seed();
            snapshot_file.write_atomic(&seed)?;
            let path_str = snapshot_file.path().display().to_string();
            Logger::info("seed_written", &[("path", path_str.as_str())]);
            seed.into_state()
        };

        Ok(Self {
            state: RwLock::new(state),
            write_gate: Mutex::new(()),
            snapshot_file,
        })
    }

    /// All envelopes, ascending by id. Never fails.
    pub async fn list(&self) -> Vec<Envelope> {
        self.state.read().await.list()
    }

    /// A single envelope, or `None`. Absence is a normal result.
    pub async fn get(&self, id: u64) -> Option<Envelope> {
        self.state.read().await.get(id).cloned()
    }

    /// Sum of all balances, for reporting.
    pub async fn total_balance_cents(&self) -> i64 {
        self.state.read().await.total_balance_cents()
    }

    /// Create a new envelope with a freshly assigned id.
    pub async fn create(
        &self,
        name: impl Into<String>,
        balance_cents: i64,
    ) -> StoreResult<Envelope> {
        if balance_cents < 0 {
            return Err(StoreError::validation(
                "balance must be a non-negative number",
            ));
        }

        let _gate = self.write_gate.lock().await;
        let envelope = {
            let mut state = self.state.write().await;
            let id = state.allocate_id();
            let envelope = Envelope::new(id, name, balance_cents, Utc::now());
            state.insert(envelope.clone());
            envelope
        };
        self.persist().await?;
        Ok(envelope)
    }

    /// Update an envelope's name and/or balance, refreshing `updatedAt`.
    pub async fn update(&self, id: u64, patch: EnvelopePatch) -> StoreResult<Envelope> {
        if matches!(patch.balance_cents, Some(balance) if balance < 0) {
            return Err(StoreError::validation(
                "balance must be a non-negative number",
            ));
        }

        let _gate = self.write_gate.lock().await;
        let envelope = {
            let mut state = self.state.write().await;
            let envelope = state.get_mut(id).ok_or(StoreError::NotFound)?;
            if let Some(name) = patch.name {
                envelope.name = name;
            }
            if let Some(balance_cents) = patch.balance_cents {
                envelope.balance_cents = balance_cents;
            }
            envelope.touch(Utc::now());
            envelope.clone()
        };
        self.persist().await?;
        Ok(envelope)
    }

    /// Remove an envelope permanently. Its id is never reused.
    pub async fn delete(&self, id: u64) -> StoreResult<()> {
        let _gate = self.write_gate.lock().await;
        {
            let mut state = self.state.write().await;
            if state.remove(id).is_none() {
                return Err(StoreError::NotFound);
            }
        }
        self.persist().await
    }

    /// Increase an envelope's balance by a strictly positive amount.
    pub async fn deposit(&self, id: u64, amount_cents: i64) -> StoreResult<Envelope> {
        if amount_cents <= 0 {
            return Err(StoreError::validation("amount must be a positive number"));
        }

        let _gate = self.write_gate.lock().await;
        let envelope = {
            let mut state = self.state.write().await;
            let envelope = state.get_mut(id).ok_or(StoreError::NotFound)?;
            let new_balance = envelope
                .balance_cents
                .checked_add(amount_cents)
                .ok_or_else(|| StoreError::conflict("balance overflow"))?;
            envelope.balance_cents = new_balance;
            envelope.touch(Utc::now());
            envelope.clone()
        };
        self.persist().await?;
        Ok(envelope)
    }

    /// Decrease an envelope's balance by a strictly positive amount.
    ///
    /// Fails with `Conflict` if the envelope holds less than `amount_cents`;
    /// a balance can never go negative.
    pub async fn withdraw(&self, id: u64, amount_cents: i64) -> StoreResult<Envelope> {
        if amount_cents <= 0 {
            return Err(StoreError::validation("amount must be a positive number"));
        }

        let _gate = self.write_gate.lock().await;
        let envelope = {
            let mut state = self.state.write().await;
            let envelope = state.get_mut(id).ok_or(StoreError::NotFound)?;
            if envelope.balance_cents < amount_cents {
                return Err(StoreError::conflict("Insufficient funds in envelope"));
            }
            envelope.balance_cents -= amount_cents;
            envelope.touch(Utc::now());
            envelope.clone()
        };
        self.persist().await?;
        Ok(envelope)
    }

    /// Move funds between two envelopes as one atomic mutation.
    ///
    /// Both legs apply under a single state lock hold with the same
    /// timestamp; the sum of the two balances is preserved exactly.
    pub async fn transfer(
        &self,
        from_id: u64,
        to_id: u64,
        amount_cents: i64,
    ) -> StoreResult<TransferOutcome> {
        if amount_cents <= 0 {
            return Err(StoreError::validation("amount must be a positive number"));
        }
        if from_id == to_id {
            return Err(StoreError::conflict("fromId and toId must be different"));
        }

        let _gate = self.write_gate.lock().await;
        let outcome = {
            let mut state = self.state.write().await;

            // All checks before the first mutation, so a failure has no
            // partial effect.
            let from_balance = match state.get(from_id) {
                Some(envelope) => envelope.balance_cents,
                None => return Err(StoreError::NotFound),
            };
            let to_balance = match state.get(to_id) {
                Some(envelope) => envelope.balance_cents,
                None => return Err(StoreError::NotFound),
            };
            if from_balance < amount_cents {
                return Err(StoreError::conflict("Insufficient funds in origin envelope"));
            }
            if to_balance.checked_add(amount_cents).is_none() {
                return Err(StoreError::conflict("balance overflow"));
            }

            let now = Utc::now();
            let from = match state.get_mut(from_id) {
                Some(envelope) => {
                    envelope.balance_cents -= amount_cents;
                    envelope.touch(now);
                    envelope.clone()
                }
                None => return Err(StoreError::NotFound),
            };
            let to = match state.get_mut(to_id) {
                Some(envelope) => {
                    envelope.balance_cents += amount_cents;
                    envelope.touch(now);
                    envelope.clone()
                }
                None => return Err(StoreError::NotFound),
            };
            TransferOutcome { from, to }
        };
        self.persist().await?;
        Ok(outcome)
    }

    /// Serialize current state and swap it into the durable file.
    ///
    /// Called with the write gate held. On failure the in-memory state has
    /// already diverged from disk; the divergence is logged as FATAL and
    /// the error surfaced, never masked or retried.
    async fn persist(&self) -> StoreResult<()> {
        let snapshot = {
            let state = self.state.read().await;
            LedgerSnapshot::from_state(&state)
        };
        if let Err(e) = self.snapshot_file.write_atomic(&snapshot) {
            let message = e.to_string();
            Logger::fatal("snapshot_persist_failed", &[("error", message.as_str())]);
            return Err(e);
        }
        Ok(())
    }
}
