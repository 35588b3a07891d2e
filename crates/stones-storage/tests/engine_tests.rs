//! Tests for storage engine traits.
//!
//! These tests validate the trait contracts and can be used to test
//! any storage engine implementation.

#![allow(dead_code)]

use stones_storage::{Cursor, StorageEngine, StorageError, StorageResult, Transaction};

/// A test harness trait for testing storage engine implementations.
pub trait TestHarness {
    /// The storage engine type being tested.
    type Engine: StorageEngine;

    /// Create a new storage engine for testing.
    fn create_engine() -> StorageResult<Self::Engine>;

    /// Clean up after tests (remove temp files, etc.).
    fn cleanup(_engine: Self::Engine) {}
}

/// Run the standard test suite against a storage engine.
pub fn run_test_suite<H: TestHarness>() {
    test_basic_operations::<H>();
    test_overwrite_flag::<H>();
    test_transaction_isolation::<H>();
    test_cursor_operations::<H>();
    test_keys_after::<H>();
    test_stat_counts_entries::<H>();
    test_soft_and_hard_drop::<H>();
    test_read_only_enforcement::<H>();
}

/// Test basic get/put/delete operations.
fn test_basic_operations<H: TestHarness>() {
    let engine = H::create_engine().expect("failed to create engine");
    let ns = engine.open_namespace(Some("test_table")).expect("failed to open namespace");

    {
        let mut tx = engine.begin_write().expect("failed to begin write");
        tx.put(&ns, b"key1", b"value1", true).expect("failed to put");
        tx.commit().expect("failed to commit");
    }

    {
        let tx = engine.begin_read().expect("failed to begin read");
        let value = tx.get(&ns, b"key1").expect("failed to get");
        assert_eq!(value, Some(b"value1".to_vec()));
    }

    {
        let mut tx = engine.begin_write().expect("failed to begin write");
        let deleted = tx.delete(&ns, b"key1").expect("failed to delete");
        assert!(deleted);
        tx.commit().expect("failed to commit");
    }

    {
        let tx = engine.begin_read().expect("failed to begin read");
        let value = tx.get(&ns, b"key1").expect("failed to get");
        assert_eq!(value, None);
    }

    // Delete non-existent key should return false
    {
        let mut tx = engine.begin_write().expect("failed to begin write");
        let deleted = tx.delete(&ns, b"nonexistent").expect("failed to delete");
        assert!(!deleted);
        tx.rollback().expect("failed to rollback");
    }

    H::cleanup(engine);
}

/// Test that `overwrite = false` keeps the first value.
fn test_overwrite_flag<H: TestHarness>() {
    let engine = H::create_engine().expect("failed to create engine");
    let ns = engine.open_namespace(None).expect("failed to open namespace");

    {
        let mut tx = engine.begin_write().expect("failed to begin write");
        assert!(tx.put(&ns, b"k", b"first", false).expect("failed to put"));
        assert!(!tx.put(&ns, b"k", b"second", false).expect("failed to put"));
        assert_eq!(tx.get(&ns, b"k").expect("failed to get"), Some(b"first".to_vec()));
        assert!(tx.put(&ns, b"k", b"third", true).expect("failed to put"));
        tx.commit().expect("failed to commit");
    }

    {
        let tx = engine.begin_read().expect("failed to begin read");
        assert_eq!(tx.get(&ns, b"k").expect("failed to get"), Some(b"third".to_vec()));
        assert_eq!(tx.stat(&ns).expect("failed to stat").entries, 1);
    }

    H::cleanup(engine);
}

/// Test that transactions provide proper isolation.
fn test_transaction_isolation<H: TestHarness>() {
    let engine = H::create_engine().expect("failed to create engine");
    let ns = engine.open_namespace(Some("test_table")).expect("failed to open namespace");

    {
        let mut tx = engine.begin_write().expect("failed to begin write");
        tx.put(&ns, b"key1", b"initial", true).expect("failed to put");
        tx.commit().expect("failed to commit");
    }

    // A snapshot taken before the write keeps seeing the old value
    let snapshot = engine.begin_read().expect("failed to begin read");

    {
        let mut write_tx = engine.begin_write().expect("failed to begin write");
        write_tx.put(&ns, b"key1", b"updated", true).expect("failed to put");
        write_tx.commit().expect("failed to commit");
    }

    let value = snapshot.get(&ns, b"key1").expect("failed to get");
    assert_eq!(value, Some(b"initial".to_vec()));
    drop(snapshot);

    {
        let read_tx = engine.begin_read().expect("failed to begin read");
        let value = read_tx.get(&ns, b"key1").expect("failed to get");
        assert_eq!(value, Some(b"updated".to_vec()));
    }

    H::cleanup(engine);
}

/// Test cursor operations: seek, next, seek_first, current.
fn test_cursor_operations<H: TestHarness>() {
    let engine = H::create_engine().expect("failed to create engine");
    let ns = engine.open_namespace(Some("test_table")).expect("failed to open namespace");

    // Insert out of order; the cursor must return key order
    {
        let mut tx = engine.begin_write().expect("failed to begin write");
        for (k, v) in [(b"d", b"4"), (b"a", b"1"), (b"e", b"5"), (b"c", b"3"), (b"b", b"2")] {
            tx.put(&ns, k, v, true).expect("failed to put");
        }
        tx.commit().expect("failed to commit");
    }

    {
        let tx = engine.begin_read().expect("failed to begin read");
        let mut cursor = tx.cursor(&ns).expect("failed to create cursor");

        let first = cursor.seek_first().expect("failed to seek_first");
        assert_eq!(first, Some((b"a".to_vec(), b"1".to_vec())));

        let second = cursor.next().expect("failed to next");
        assert_eq!(second, Some((b"b".to_vec(), b"2".to_vec())));

        let current = cursor.current();
        assert_eq!(current, Some((b"b".as_slice(), b"2".as_slice())));

        let c = cursor.seek(b"c").expect("failed to seek");
        assert_eq!(c, Some((b"c".to_vec(), b"3".to_vec())));

        // Seek to a missing key lands on the next greater one
        let d = cursor.seek(b"cc").expect("failed to seek");
        assert_eq!(d, Some((b"d".to_vec(), b"4".to_vec())));

        cursor.next().expect("failed to next");
        let past_end = cursor.next().expect("failed to next");
        assert_eq!(past_end, None);
        assert_eq!(cursor.current(), None);

        // Stays exhausted
        assert_eq!(cursor.next().expect("failed to next"), None);
    }

    // A fresh cursor starts at the first entry on `next`
    {
        let tx = engine.begin_read().expect("failed to begin read");
        let mut cursor = tx.cursor(&ns).expect("failed to create cursor");
        let first = cursor.next().expect("failed to next");
        assert_eq!(first.map(|(k, _)| k), Some(b"a".to_vec()));
    }

    H::cleanup(engine);
}

/// Test key-only listing: ordering, resumption after a key, and limits.
fn test_keys_after<H: TestHarness>() {
    let engine = H::create_engine().expect("failed to create engine");
    let ns = engine.open_namespace(Some("listing")).expect("failed to open namespace");

    {
        let mut tx = engine.begin_write().expect("failed to begin write");
        for key in [b"c".as_slice(), b"a", b"e", b"b", b"d"] {
            tx.put(&ns, key, b"v", true).expect("failed to put");
        }
        // Uncommitted keys are visible to the writing transaction.
        let keys = tx.keys_after(&ns, None, 10).expect("failed to list keys");
        let expected: Vec<Vec<u8>> = [b"a", b"b", b"c", b"d", b"e"].map(|k| k.to_vec()).into();
        assert_eq!(keys, expected);
        tx.commit().expect("failed to commit");
    }

    {
        let tx = engine.begin_read().expect("failed to begin read");
        let first = tx.keys_after(&ns, None, 2).expect("failed to list keys");
        assert_eq!(first, vec![b"a".to_vec(), b"b".to_vec()]);

        let rest = tx.keys_after(&ns, Some(b"b".as_slice()), 10).expect("failed to list keys");
        assert_eq!(rest, vec![b"c".to_vec(), b"d".to_vec(), b"e".to_vec()]);

        // Resuming after a key that is not stored starts at the next one.
        let between = tx.keys_after(&ns, Some(b"bb".as_slice()), 1).expect("failed to list keys");
        assert_eq!(between, vec![b"c".to_vec()]);

        let past_end = tx.keys_after(&ns, Some(b"e".as_slice()), 10).expect("failed to list keys");
        assert!(past_end.is_empty());
        assert!(tx.keys_after(&ns, None, 0).expect("failed to list keys").is_empty());
    }

    {
        let missing = stones_storage::Namespace::named("never_opened").expect("valid name");
        let tx = engine.begin_read().expect("failed to begin read");
        let err = tx.keys_after(&missing, None, 10).expect_err("missing namespace must fail");
        assert!(err.is_not_found(), "unexpected error: {err}");
    }

    H::cleanup(engine);
}

/// Test that stat reports the entry count.
fn test_stat_counts_entries<H: TestHarness>() {
    let engine = H::create_engine().expect("failed to create engine");
    let ns = engine.open_namespace(Some("counted")).expect("failed to open namespace");

    {
        let tx = engine.begin_read().expect("failed to begin read");
        assert_eq!(tx.stat(&ns).expect("failed to stat").entries, 0);
    }

    {
        let mut tx = engine.begin_write().expect("failed to begin write");
        for i in 0..3u8 {
            tx.put(&ns, &[i], &[i], true).expect("failed to put");
        }
        tx.delete(&ns, &[1]).expect("failed to delete");
        tx.commit().expect("failed to commit");
    }

    {
        let tx = engine.begin_read().expect("failed to begin read");
        assert_eq!(tx.stat(&ns).expect("failed to stat").entries, 2);
    }

    H::cleanup(engine);
}

/// Test the difference between keeping and deleting a namespace definition.
fn test_soft_and_hard_drop<H: TestHarness>() {
    let engine = H::create_engine().expect("failed to create engine");
    let soft = engine.open_namespace(Some("soft")).expect("failed to open namespace");
    let hard = engine.open_namespace(Some("hard")).expect("failed to open namespace");

    {
        let mut tx = engine.begin_write().expect("failed to begin write");
        tx.put(&soft, b"k", b"v", true).expect("failed to put");
        tx.put(&hard, b"k", b"v", true).expect("failed to put");
        tx.commit().expect("failed to commit");
    }

    {
        let mut tx = engine.begin_write().expect("failed to begin write");
        tx.drop_namespace(&soft, true).expect("failed to clear");
        tx.drop_namespace(&hard, false).expect("failed to drop");
        tx.commit().expect("failed to commit");
    }

    {
        let tx = engine.begin_read().expect("failed to begin read");
        assert_eq!(tx.get(&soft, b"k").expect("soft-dropped namespace is usable"), None);
        assert_eq!(tx.stat(&soft).expect("failed to stat").entries, 0);

        let err = tx.get(&hard, b"k").unwrap_err();
        assert!(err.is_not_found(), "unexpected error: {err}");
    }

    // Writes to a deleted namespace fail instead of recreating it
    {
        let mut tx = engine.begin_write().expect("failed to begin write");
        let err = tx.put(&hard, b"k", b"v", true).unwrap_err();
        assert!(matches!(err, StorageError::NamespaceNotFound(_)));
        tx.rollback().expect("failed to rollback");
    }

    // Reopening brings it back, empty
    let hard = engine.open_namespace(Some("hard")).expect("failed to reopen namespace");
    {
        let tx = engine.begin_read().expect("failed to begin read");
        assert_eq!(tx.stat(&hard).expect("failed to stat").entries, 0);
    }

    H::cleanup(engine);
}

/// Test that read-only transactions reject write operations.
fn test_read_only_enforcement<H: TestHarness>() {
    let engine = H::create_engine().expect("failed to create engine");
    let ns = engine.open_namespace(None).expect("failed to open namespace");

    {
        let mut tx = engine.begin_read().expect("failed to begin read");
        assert!(tx.is_read_only());
        let err = tx.put(&ns, b"k", b"v", true).unwrap_err();
        assert!(matches!(err, StorageError::ReadOnly));
        let err = tx.drop_namespace(&ns, true).unwrap_err();
        assert!(matches!(err, StorageError::ReadOnly));
    }

    {
        let tx = engine.begin_write().expect("failed to begin write");
        assert!(!tx.is_read_only());
        tx.rollback().expect("failed to rollback");
    }

    H::cleanup(engine);
}

/// Test that the Cursor trait is object-safe by requiring it.
#[test]
fn test_cursor_object_safety() {
    fn _takes_cursor(_: &dyn Cursor) {}
}

/// Test error types implement the Error trait.
#[test]
fn test_error_types() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
    assert_error::<StorageError>();

    let err = StorageError::MapFull { size: 10, ceiling: 8 };
    assert!(err.to_string().contains("8 byte ceiling"));
}
