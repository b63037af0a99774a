//! Draft persistence against the directory-backed store.
//!
//! Exercises the full path a device takes: the writer task saves through a
//! [`FileStore`], a fresh store instance over the same directory reads the
//! record back, and `clear_all` removes only draft files.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use kismet_core::draft::{Choice, Gender};
use kismet_core::FormDraft;
use kismet_store::{DraftStore, DraftWriter, FileStore, KeyValueStore};

fn draft() -> FormDraft {
    FormDraft {
        bio_en: "Looking for someone kind".into(),
        gender: Some(Gender::Male),
        date_of_birth: NaiveDate::from_ymd_opt(1995, 12, 31),
        city_id: Some(12),
        hobbies: vec![Choice::Id(3), Choice::Id(5)],
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Test: records survive a new store instance
// ---------------------------------------------------------------------------

#[tokio::test]
async fn record_survives_reopen_with_date_intact() {
    let dir = tempfile::tempdir().unwrap();

    let writer_store = DraftStore::new(Arc::new(FileStore::new(dir.path())));
    let writer = DraftWriter::spawn(writer_store, "user-1".into());
    writer.enqueue(1, FormDraft::default());
    writer.enqueue(2, draft());
    writer.shutdown().await;

    let reopened = DraftStore::new(Arc::new(FileStore::new(dir.path())));
    let record = reopened.load(Some("user-1")).await.unwrap();

    assert_eq!(record.step, 2);
    assert_eq!(record.form_data, draft());
    assert_eq!(
        record.form_data.date_of_birth,
        NaiveDate::from_ymd_opt(1995, 12, 31)
    );
    assert!(record.is_fresh(Utc::now(), Duration::hours(24)));
}

// ---------------------------------------------------------------------------
// Test: stale records are reported as stale, not dropped by the store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_keeps_stale_records_for_caller_to_judge() {
    let dir = tempfile::tempdir().unwrap();
    let store = DraftStore::new(Arc::new(FileStore::new(dir.path())));

    let saved_at = Utc::now() - Duration::hours(25);
    store.save_at(Some("u"), 3, &draft(), saved_at).await;

    let record = store.load(Some("u")).await.unwrap();
    assert!(!record.is_fresh(Utc::now(), Duration::hours(24)));
}

// ---------------------------------------------------------------------------
// Test: clear_all touches only draft files
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clear_all_removes_draft_files_only() {
    let dir = tempfile::tempdir().unwrap();
    let kv = Arc::new(FileStore::new(dir.path()));
    let store = DraftStore::new(kv.clone());

    store.save(Some("a"), 1, &draft()).await;
    store.save(Some("b"), 2, &draft()).await;
    kv.set("settings", "{}".into()).await.unwrap();

    store.clear_all().await;

    assert_eq!(kv.keys().await.unwrap(), ["settings"]);
    assert_eq!(store.load(Some("a")).await, None);
}
