//! Draft store end-to-end tests across both storage backends

use custodial_sync::client::drafts::{DraftKey, DraftStore, LEGACY_KEYS};
use custodial_sync::client::storage::{KeyValueStorage, MemoryStorage, SqliteStorage};
use custodial_sync::shared::clock::ManualClock;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

#[tokio::test]
async fn test_expired_draft_is_deleted_not_skipped() {
    let clock = ManualClock::starting_now();
    let storage = Arc::new(MemoryStorage::new());
    let store = DraftStore::new(storage.clone()).with_clock(Arc::new(clock.clone()));
    let key = DraftKey::Inspection.as_str();

    assert!(store.save(key, &json!({ "school": "ASA", "rating": 5 })).await);
    clock.advance(chrono::Duration::days(8));

    assert_eq!(store.load::<Value>(key).await, None);
    assert_eq!(storage.get(key).await.unwrap(), None);
    assert_eq!(store.load::<Value>(key).await, None);
}

#[tokio::test]
async fn test_sqlite_drafts_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drafts.db");
    let key = DraftKey::BuildingInspection.as_str();
    let data = json!({ "school": "Lincoln", "rooms": [{ "roomType": "gym", "floors": 4 }] });

    {
        let storage = SqliteStorage::open(&path).await.unwrap();
        let store = DraftStore::new(Arc::new(storage.clone()));
        assert!(store.save(key, &data).await);
        storage.close().await;
    }

    let storage = SqliteStorage::open(&path).await.unwrap();
    let store = DraftStore::new(Arc::new(storage));
    assert_eq!(store.load::<Value>(key).await, Some(data));
}

#[tokio::test]
async fn test_sqlite_expiry_removes_row() {
    let clock = ManualClock::starting_now();
    let storage = Arc::new(SqliteStorage::in_memory().await.unwrap());
    let store = DraftStore::new(storage.clone()).with_clock(Arc::new(clock.clone()));
    let key = DraftKey::CustodialNote.as_str();

    assert!(store.save(key, &json!({ "notes": "leak" })).await);
    clock.advance(chrono::Duration::days(7) + chrono::Duration::milliseconds(1));

    assert_eq!(store.load::<Value>(key).await, None);
    assert!(storage.keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_startup_migration() {
    let clock = ManualClock::starting_now();
    let storage = Arc::new(MemoryStorage::new());
    let store = DraftStore::new(storage.clone()).with_clock(Arc::new(clock.clone()));

    for key in LEGACY_KEYS {
        storage.insert_raw(key, "[]").await;
    }
    store.save(DraftKey::Inspection.as_str(), &json!({ "old": true })).await;
    clock.advance(chrono::Duration::days(10));
    store.save(DraftKey::CustodialNote.as_str(), &json!({ "fresh": true })).await;

    store.migrate_legacy_drafts().await;

    let keys = storage.keys().await.unwrap();
    assert_eq!(keys, vec![DraftKey::CustodialNote.as_str().to_string()]);
}
