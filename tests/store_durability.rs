//! Store Durability Tests
//!
//! - Every acknowledged write survives a reopen
//! - Ids are never reused, including across restarts after deletes
//! - A damaged record file refuses to open instead of loading partial state

use std::fs;
use std::path::Path;

use chrono::{Duration, TimeZone, Utc};
use quilldb::content::ContentError;
use quilldb::model::{EntityKind, NewPost, PostPatch};
use quilldb::storage::{self, StorageErrorCode, StorageWriter, StoredRecord};
use quilldb::store::{DeletePolicy, FixedClock, RecordStore};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_temp_data_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn open_store(data_dir: &Path) -> RecordStore {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    RecordStore::open(data_dir)
        .unwrap()
        .with_clock(Box::new(FixedClock::stepping(start, Duration::minutes(5))))
}

fn assert_corruption(result: Result<RecordStore, ContentError>) {
    match result {
        Err(ContentError::StorageUnavailable(e)) => {
            assert_eq!(e.code(), StorageErrorCode::QuillDataCorruption);
            assert!(e.is_fatal());
        }
        Err(other) => panic!("expected corruption, got {}", other),
        Ok(_) => panic!("expected corruption, store opened"),
    }
}

// =============================================================================
// Reopen
// =============================================================================

#[test]
fn test_writes_survive_reopen() {
    let temp_dir = create_temp_data_dir();
    let data_dir = temp_dir.path();

    let (tech, post) = {
        let store = open_store(data_dir);
        let tech = store.create_category("Tech").unwrap();
        let post = store
            .create_post(NewPost::new("Intro", "Databases are like spreadsheets").in_category(tech.id))
            .unwrap();
        (tech, post)
    };

    let store = open_store(data_dir);
    assert_eq!(store.get_category(tech.id).unwrap(), tech);
    assert_eq!(store.get_post(post.id).unwrap(), post);
}

#[test]
fn test_latest_update_wins_after_reopen() {
    let temp_dir = create_temp_data_dir();
    let data_dir = temp_dir.path();

    let post = {
        let store = open_store(data_dir);
        let post = store.create_post(NewPost::new("v1", "body")).unwrap();
        store
            .update_post(post.id, &PostPatch::new().title("v2"))
            .unwrap();
        store
            .update_post(post.id, &PostPatch::new().title("v3"))
            .unwrap()
    };

    let store = open_store(data_dir);
    let reloaded = store.get_post(post.id).unwrap();
    assert_eq!(reloaded.title, "v3");
    assert_eq!(reloaded.created_at, post.created_at);
}

#[test]
fn test_deletes_survive_reopen() {
    let temp_dir = create_temp_data_dir();
    let data_dir = temp_dir.path();

    {
        let store = open_store(data_dir);
        let tech = store.create_category("Tech").unwrap();
        store
            .create_post(NewPost::new("a", "b").in_category(tech.id))
            .unwrap();
        let loose = store.create_post(NewPost::new("c", "d")).unwrap();
        store.delete_post(loose.id).unwrap();
        store.delete_category(tech.id, DeletePolicy::Cascade).unwrap();
    }

    let store = open_store(data_dir);
    assert_eq!(store.counts().unwrap(), (0, 0));
}

// =============================================================================
// Id Allocation
// =============================================================================

#[test]
fn test_ids_not_reused_after_restart() {
    let temp_dir = create_temp_data_dir();
    let data_dir = temp_dir.path();

    let (last_post, last_category) = {
        let store = open_store(data_dir);
        let category = store.create_category("Old").unwrap();
        store.create_post(NewPost::new("a", "b")).unwrap();
        let post = store.create_post(NewPost::new("c", "d")).unwrap();
        store.delete_post(post.id).unwrap();
        store.delete_category(category.id, DeletePolicy::Block).unwrap();
        (post.id, category.id)
    };

    let store = open_store(data_dir);
    let post = store.create_post(NewPost::new("e", "f")).unwrap();
    let category = store.create_category("New").unwrap();

    assert!(post.id > last_post);
    assert!(category.id > last_category);
}

#[test]
fn test_created_at_monotonic_across_reopen() {
    let temp_dir = create_temp_data_dir();
    let data_dir = temp_dir.path();

    let first = {
        let store = open_store(data_dir);
        store.create_post(NewPost::new("a", "b")).unwrap()
    };

    // Wall clock now reads a day earlier than the stored post
    let earlier = Utc.with_ymd_and_hms(2023, 12, 31, 12, 0, 0).unwrap();
    let store = RecordStore::open(data_dir)
        .unwrap()
        .with_clock(Box::new(FixedClock::frozen(earlier)));
    let second = store.create_post(NewPost::new("c", "d")).unwrap();
    assert_eq!(second.created_at, first.created_at);
    assert!(second.id > first.id);
}

// =============================================================================
// Corruption
// =============================================================================

#[test]
fn test_flipped_byte_refuses_open() {
    let temp_dir = create_temp_data_dir();
    let data_dir = temp_dir.path();
    {
        let store = open_store(data_dir);
        store.create_category("Tech").unwrap();
    }

    let path = storage::records_path(data_dir);
    let mut contents = fs::read(&path).unwrap();
    // Inside the JSON payload of the first record
    contents[20] ^= 0xFF;
    fs::write(&path, contents).unwrap();

    assert_corruption(RecordStore::open(data_dir));
}

#[test]
fn test_truncated_tail_refuses_open() {
    let temp_dir = create_temp_data_dir();
    let data_dir = temp_dir.path();
    {
        let store = open_store(data_dir);
        store.create_category("Tech").unwrap();
        store.create_post(NewPost::new("a", "b")).unwrap();
    }

    let path = storage::records_path(data_dir);
    let contents = fs::read(&path).unwrap();
    fs::write(&path, &contents[..contents.len() - 3]).unwrap();

    assert_corruption(RecordStore::open(data_dir));
}

#[test]
fn test_dangling_reference_in_file_refuses_open() {
    let temp_dir = create_temp_data_dir();
    let data_dir = temp_dir.path();
    {
        let store = open_store(data_dir);
        let tech = store.create_category("Tech").unwrap();
        store
            .create_post(NewPost::new("a", "b").in_category(tech.id))
            .unwrap();
    }

    // A category tombstone written behind the store's back
    {
        let mut writer = StorageWriter::open(data_dir).unwrap();
        writer
            .write(&StoredRecord::tombstone(EntityKind::Category, 1))
            .unwrap();
    }

    assert_corruption(RecordStore::open(data_dir));
}
