//! Property-based tests for the draft store
//!
//! Uses proptest to generate random form state and retention ages.

use custodial_sync::client::drafts::DraftStore;
use custodial_sync::client::storage::MemoryStorage;
use custodial_sync::shared::clock::ManualClock;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn form_state() -> impl Strategy<Value = Value> {
    (
        "[A-Za-z ]{0,24}",
        prop::option::of(1u8..=5),
        prop::collection::vec("[a-z0-9]{1,8}", 0..5),
        any::<bool>(),
    )
        .prop_map(|(school, rating, rooms, completed)| {
            json!({
                "school": school,
                "rating": rating,
                "rooms": rooms,
                "isCompleted": completed,
            })
        })
}

proptest! {
    #[test]
    fn test_load_within_retention_returns_saved_data(
        data in form_state(),
        age_hours in 0i64..(7 * 24),
    ) {
        let rt = runtime();
        let clock = ManualClock::starting_now();
        let store = DraftStore::new(Arc::new(MemoryStorage::new()))
            .with_clock(Arc::new(clock.clone()));

        let loaded: Option<Value> = rt.block_on(async {
            prop_assert!(store.save("custodial-prop", &data).await);
            clock.advance(chrono::Duration::hours(age_hours));
            Ok(store.load("custodial-prop").await)
        })?;
        prop_assert_eq!(loaded, Some(data));
    }

    #[test]
    fn test_load_past_retention_is_none(
        data in form_state(),
        extra_minutes in 1i64..(30 * 24 * 60),
    ) {
        let rt = runtime();
        let clock = ManualClock::starting_now();
        let store = DraftStore::new(Arc::new(MemoryStorage::new()))
            .with_clock(Arc::new(clock.clone()));

        let (first, second): (Option<Value>, Option<Value>) = rt.block_on(async {
            store.save("custodial-prop", &data).await;
            clock.advance(chrono::Duration::days(7) + chrono::Duration::minutes(extra_minutes));
            (store.load("custodial-prop").await, store.load("custodial-prop").await)
        });
        prop_assert_eq!(first, None);
        prop_assert_eq!(second, None);
    }
}
