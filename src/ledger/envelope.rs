//! The envelope record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named budget bucket holding a non-negative balance in integer cents.
///
/// Serialized field names are the snapshot wire format: `balanceCents`,
/// `createdAt`, `updatedAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Unique identifier, assigned once at creation, never reused.
    pub id: u64,

    /// Display name. Validated at the API boundary, opaque to the ledger.
    pub name: String,

    /// Balance in integer minor units. Never negative.
    #[serde(rename = "balanceCents")]
    pub balance_cents: i64,

    /// Fixed at creation.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation of this envelope.
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Envelope {
    /// Create a new envelope with both timestamps set to `now`.
    pub fn new(id: u64, name: impl Into<String>, balance_cents: i64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            balance_cents,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the modification timestamp.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
