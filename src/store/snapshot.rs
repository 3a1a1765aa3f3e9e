//! The durable snapshot payload: all envelopes plus the next id.
//!
//! This is the only bit-exact durable contract: a single JSON object with
//! `nextId` and the envelope list.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ledger::{Envelope, LedgerState};

use super::errors::{StoreError, StoreResult};

/// Complete serialized ledger state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSnapshot {
    #[serde(rename = "nextId")]
    pub next_id: u64,
    pub envelopes: Vec<Envelope>,
}

/// Lenient parse target: envelope records are kept as raw values so a
/// single bad record can be dropped without rejecting the whole file.
#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(rename = "nextId")]
    next_id: u64,
    #[serde(default)]
    envelopes: Vec<Value>,
}

impl LedgerSnapshot {
    /// The default data set for a fresh ledger.
    pub fn seed() -> Self {
        let now = Utc::now();
        Self {
            next_id: 4,
            envelopes: vec![
                Envelope::new(1, "Rent", 100000, now),
                Envelope::new(2, "Groceries", 30000, now),
                Envelope::new(3, "Entertainment", 40000, now),
            ],
        }
    }

    /// Capture the current state.
    pub fn from_state(state: &LedgerState) -> Self {
        Self {
            next_id: state.next_id(),
            envelopes: state.list(),
        }
    }

    /// Rebuild state from this snapshot.
    pub fn into_state(self) -> LedgerState {
        LedgerState::from_parts(self.next_id, self.envelopes)
    }

    /// Serialize to the durable JSON representation.
    pub fn to_json(&self) -> StoreResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StoreError::snapshot_write(format!("failed to serialize snapshot: {}", e)))
    }

    /// Parse the durable JSON representation.
    ///
    /// The file as a whole must parse and carry an integer `nextId`;
    /// anything else is unrecoverable. Individual envelope records that do
    /// not deserialize (above all, ones without a valid integer id) are
    /// silently dropped.
    pub fn from_json(raw: &str) -> StoreResult<Self> {
        let raw: RawSnapshot = serde_json::from_str(raw)
            .map_err(|e| StoreError::snapshot_load(format!("invalid snapshot JSON: {}", e)))?;

        let envelopes = raw
            .envelopes
            .into_iter()
            .filter_map(|record| serde_json::from_value::<Envelope>(record).ok())
            .collect();

        Ok(Self {
            next_id: raw.next_id,
            envelopes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_contents() {
        let seed = LedgerSnapshot::seed();

        assert_eq!(seed.next_id, 4);
        assert_eq!(seed.envelopes.len(), 3);

        let ids: Vec<u64> = seed.envelopes.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        assert_eq!(seed.envelopes[0].name, "Rent");
        assert_eq!(seed.envelopes[0].balance_cents, 100000);
        assert_eq!(seed.envelopes[1].name, "Groceries");
        assert_eq!(seed.envelopes[1].balance_cents, 30000);
        assert_eq!(seed.envelopes[2].name, "Entertainment");
        assert_eq!(seed.envelopes[2].balance_cents, 40000);
    }

    #[test]
    fn test_json_wire_fields() {
        let json = LedgerSnapshot::seed().to_json().unwrap();

        assert!(json.contains("\"nextId\": 4"));
        assert!(json.contains("\"balanceCents\": 100000"));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
    }

    #[test]
    fn test_json_round_trip() {
        let seed = LedgerSnapshot::seed();
        let json = seed.to_json().unwrap();
        let parsed = LedgerSnapshot::from_json(&json).unwrap();

        assert_eq!(seed, parsed);
    }

    #[test]
    fn test_state_round_trip() {
        let seed = LedgerSnapshot::seed();
        let state = seed.clone().into_state();

        assert_eq!(LedgerSnapshot::from_state(&state), seed);
    }

    #[test]
    fn test_invalid_records_are_dropped() {
        let json = r#"{
            "nextId": 9,
            "envelopes": [
                {"id": 1, "name": "Rent", "balanceCents": 100000,
                 "createdAt": "2026-08-07T12:00:00Z", "updatedAt": "2026-08-07T12:00:00Z"},
                {"id": "not-a-number", "name": "Bad", "balanceCents": 1,
                 "createdAt": "2026-08-07T12:00:00Z", "updatedAt": "2026-08-07T12:00:00Z"},
                {"name": "No id at all"}
            ]
        }"#;

        let snapshot = LedgerSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.next_id, 9);
        assert_eq!(snapshot.envelopes.len(), 1);
        assert_eq!(snapshot.envelopes[0].id, 1);
    }

    #[test]
    fn test_missing_next_id_is_an_error() {
        let result = LedgerSnapshot::from_json(r#"{"envelopes": []}"#);
        assert!(matches!(result, Err(StoreError::SnapshotLoad(_))));
    }

    #[test]
    fn test_garbage_is_an_error() {
        let result = LedgerSnapshot::from_json("definitely not json");
        assert!(matches!(result, Err(StoreError::SnapshotLoad(_))));
    }

    #[test]
    fn test_missing_envelope_list_defaults_to_empty() {
        let snapshot = LedgerSnapshot::from_json(r#"{"nextId": 1}"#).unwrap();
        assert!(snapshot.envelopes.is_empty());
    }
}
