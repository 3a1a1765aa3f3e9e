//! End-to-end ledger store scenarios
//!
//! Exercises the full operation surface against a real snapshot file on a
//! temporary directory, including the seeded default data set.

use std::path::PathBuf;

use budgetd::store::{EnvelopePatch, LedgerStore, StoreError};
use tempfile::TempDir;

fn snapshot_path(dir: &TempDir) -> PathBuf {
    dir.path().join("data").join("envelopes.json")
}

fn open_store(dir: &TempDir) -> LedgerStore {
    LedgerStore::initialize(&snapshot_path(dir)).unwrap()
}

#[tokio::test]
async fn seed_load_lists_three_envelopes() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let envelopes = store.list().await;
    assert_eq!(envelopes.len(), 3);

    let ids: Vec<u64> = envelopes.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    assert_eq!(envelopes[0].name, "Rent");
    assert_eq!(envelopes[0].balance_cents, 100000);
    assert_eq!(envelopes[1].name, "Groceries");
    assert_eq!(envelopes[1].balance_cents, 30000);
    assert_eq!(envelopes[2].name, "Entertainment");
    assert_eq!(envelopes[2].balance_cents, 40000);

    // The seed is durable before any operation runs
    let raw = std::fs::read_to_string(snapshot_path(&dir)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["nextId"], 4);
    assert_eq!(parsed["envelopes"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn create_assigns_id_four_then_five() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let scuba = store.create("Scuba lessons", 30000).await.unwrap();
    assert_eq!(scuba.id, 4);
    assert_eq!(scuba.balance_cents, 30000);

    let next = store.create("Books", 0).await.unwrap();
    assert_eq!(next.id, 5);
}

#[tokio::test]
async fn withdraw_reduces_balance() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let groceries = store.withdraw(2, 5000).await.unwrap();
    assert_eq!(groceries.balance_cents, 25000);
}

#[tokio::test]
async fn overdraw_fails_conflict_and_balance_is_unchanged() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    store.withdraw(2, 5000).await.unwrap();

    let result = store.withdraw(2, 100000).await;
    assert!(matches!(result, Err(StoreError::Conflict(_))));
    assert_eq!(store.get(2).await.unwrap().balance_cents, 25000);
}

#[tokio::test]
async fn transfer_moves_funds_and_conserves_the_sum() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let before = store.get(1).await.unwrap().balance_cents + store.get(2).await.unwrap().balance_cents;

    let outcome = store.transfer(1, 2, 10000).await.unwrap();
    assert_eq!(outcome.from.balance_cents, 90000);
    assert_eq!(outcome.to.balance_cents, 40000);

    let after = outcome.from.balance_cents + outcome.to.balance_cents;
    assert_eq!(before, after);
}

#[tokio::test]
async fn transfer_to_self_fails_conflict_with_no_changes() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let result = store.transfer(1, 1, 1000).await;
    assert!(matches!(result, Err(StoreError::Conflict(_))));
    assert_eq!(store.get(1).await.unwrap().balance_cents, 100000);
}

#[tokio::test]
async fn deposit_increases_balance_and_refreshes_timestamp() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let before = store.get(3).await.unwrap();
    let after = store.deposit(3, 2500).await.unwrap();

    assert_eq!(after.balance_cents, 42500);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);
}

#[tokio::test]
async fn update_supports_partial_and_full_patches() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let renamed = store
        .update(
            1,
            EnvelopePatch {
                name: Some("Mortgage".to_string()),
                balance_cents: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Mortgage");
    assert_eq!(renamed.balance_cents, 100000);

    let replaced = store
        .update(
            1,
            EnvelopePatch {
                name: Some("Rent".to_string()),
                balance_cents: Some(50000),
            },
        )
        .await
        .unwrap();
    assert_eq!(replaced.name, "Rent");
    assert_eq!(replaced.balance_cents, 50000);
}

#[tokio::test]
async fn ids_stay_monotonic_across_deletes() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    store.delete(3).await.unwrap();
    store.delete(2).await.unwrap();

    let created = store.create("New", 0).await.unwrap();
    assert_eq!(created.id, 4);

    // Survives a restart too
    drop(store);
    let store = open_store(&dir);
    let created = store.create("Newer", 0).await.unwrap();
    assert_eq!(created.id, 5);
}

#[tokio::test]
async fn missing_envelopes_report_not_found() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    assert!(store.get(99).await.is_none());
    assert!(matches!(
        store.deposit(99, 100).await,
        Err(StoreError::NotFound)
    ));
    assert!(matches!(
        store.withdraw(99, 100).await,
        Err(StoreError::NotFound)
    ));
    assert!(matches!(store.delete(99).await, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn balances_never_observed_negative() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    // Drain Groceries exactly, then try to overdraw
    store.withdraw(2, 30000).await.unwrap();
    assert_eq!(store.get(2).await.unwrap().balance_cents, 0);

    let result = store.withdraw(2, 1).await;
    assert!(matches!(result, Err(StoreError::Conflict(_))));

    for envelope in store.list().await {
        assert!(envelope.balance_cents >= 0);
    }
}
