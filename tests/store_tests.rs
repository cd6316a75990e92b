//! Tests for KvStore and JsonFile
//!
//! These tests verify:
//! - Basic get/put/delete operations
//! - Snapshot ordering
//! - Save/load round trips through the JSON file
//! - Missing and corrupt data files

use std::collections::BTreeMap;
use std::fs;

use kvline::store::{JsonFile, KvStore, Persistence};
use kvline::KvError;
use tempfile::TempDir;

// =============================================================================
// KvStore Tests
// =============================================================================

#[test]
fn test_new_store_is_empty() {
    let store = KvStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
    assert!(store.snapshot().is_empty());
}

#[test]
fn test_put_and_get() {
    let store = KvStore::new();
    store.put("key1", "value1");

    assert_eq!(store.get("key1"), Some("value1".to_string()));
    assert_eq!(store.get("missing"), None);
}

#[test]
fn test_put_overwrites_existing() {
    let store = KvStore::new();
    store.put("key", "old");
    store.put("key", "new");

    assert_eq!(store.get("key"), Some("new".to_string()));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_repeated_put_is_idempotent() {
    let once = KvStore::new();
    once.put("k", "v");

    let many = KvStore::new();
    for _ in 0..10 {
        many.put("k", "v");
    }

    assert_eq!(once.snapshot(), many.snapshot());
}

#[test]
fn test_delete_reports_presence() {
    let store = KvStore::new();
    store.put("key", "value");

    assert!(store.delete("key"));
    assert!(!store.delete("key"));
    assert_eq!(store.get("key"), None);
}

#[test]
fn test_snapshot_is_sorted_and_stable() {
    let store = KvStore::new();
    store.put("charlie", "3");
    store.put("alpha", "1");
    store.put("bravo", "2");

    let first = store.snapshot();
    let second = store.snapshot();

    assert_eq!(first, second);
    let keys: Vec<&str> = first.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["alpha", "bravo", "charlie"]);
}

#[test]
fn test_from_entries() {
    let store = KvStore::from_entries(vec![
        ("a".to_string(), "1".to_string()),
        ("b".to_string(), "2".to_string()),
    ]);

    assert_eq!(store.len(), 2);
    assert_eq!(store.get("b"), Some("2".to_string()));
}

// =============================================================================
// JsonFile Tests
// =============================================================================

#[test]
fn test_load_missing_file_is_empty() {
    let temp = TempDir::new().unwrap();
    let file = JsonFile::new(temp.path().join("contents.json"));

    assert!(file.load().unwrap().is_empty());
}

#[test]
fn test_save_then_load_round_trip() {
    let temp = TempDir::new().unwrap();
    let file = JsonFile::new(temp.path().join("contents.json"));

    let store = KvStore::new();
    store.put("foo", "bar");
    store.put("spaced key", "spaced value");
    store.put("gone", "soon");
    store.delete("gone");
    store.put("foo", "baz");

    file.save(&store.snapshot()).unwrap();
    let loaded = file.load().unwrap();

    let expected: BTreeMap<String, String> = store.snapshot().into_iter().collect();
    assert_eq!(loaded, expected);
}

#[test]
fn test_save_overwrites_in_full() {
    let temp = TempDir::new().unwrap();
    let file = JsonFile::new(temp.path().join("contents.json"));

    file.save(&[("a".to_string(), "1".to_string())]).unwrap();
    file.save(&[("b".to_string(), "2".to_string())]).unwrap();

    let loaded = file.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get("b"), Some(&"2".to_string()));
}

#[test]
fn test_save_replaces_file_without_leftovers() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("contents.json");
    fs::write(&path, r#"{"data":[{"key":"old","value":"1"}]}"#).unwrap();
    let file = JsonFile::new(&path);

    file.save(&[("new".to_string(), "2".to_string())]).unwrap();

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["contents.json".to_string()]);

    let loaded = file.load().unwrap();
    assert_eq!(loaded.get("new"), Some(&"2".to_string()));
    assert!(loaded.get("old").is_none());
}

#[test]
fn test_save_creates_parent_directory() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("dir").join("contents.json");
    let file = JsonFile::new(&path);

    file.save(&[]).unwrap();

    assert!(path.exists());
}

#[test]
fn test_file_layout() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("contents.json");
    let file = JsonFile::new(&path);

    file.save(&[("k".to_string(), "v".to_string())]).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json, serde_json::json!({ "data": [{ "key": "k", "value": "v" }] }));
}

#[test]
fn test_load_accepts_handwritten_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("contents.json");
    fs::write(
        &path,
        r#"{"data":[{"value":"1","key":"one"},{"key":"two","value":"2"}]}"#,
    )
    .unwrap();

    let loaded = JsonFile::new(&path).load().unwrap();
    assert_eq!(loaded.get("one"), Some(&"1".to_string()));
    assert_eq!(loaded.get("two"), Some(&"2".to_string()));
}

#[test]
fn test_load_corrupt_file_is_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("contents.json");
    fs::write(&path, "not json at all").unwrap();

    let err = JsonFile::new(&path).load().unwrap_err();
    assert!(matches!(err, KvError::Persistence(_)));
}

#[test]
fn test_location_is_file_name() {
    let file = JsonFile::new("/some/where/contents.json");
    assert_eq!(file.location(), "contents.json");
}
