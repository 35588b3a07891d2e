//! Core storage engine traits.
//!
//! This module defines the fundamental traits for storage backends:
//!
//! - [`StorageEngine`] - The main entry point for storage operations
//! - [`Transaction`] - ACID transaction support with read/write operations
//! - [`Cursor`] - Ordered iteration over key-value pairs
//!
//! Transactions are not bound to a single namespace; every operation names
//! the [`Namespace`] it works on, so one write transaction can touch several
//! namespaces atomically.

use std::sync::Arc;

use super::{Namespace, NamespaceStat, StorageError, StorageResult};

/// A key-value pair returned by cursor operations.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// Result type for cursor operations that return a key-value pair.
pub type CursorResult = Result<Option<KeyValue>, StorageError>;

/// A storage engine that provides transactional key-value operations.
///
/// Implementations must be thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use stones_storage::{StorageEngine, StorageResult, Transaction};
///
/// fn example<E: StorageEngine>(engine: &E) -> StorageResult<()> {
///     let ns = engine.open_namespace(Some("my_table"))?;
///
///     let mut tx = engine.begin_write()?;
///     tx.put(&ns, b"key", b"value", true)?;
///     tx.commit()?;
///
///     let tx = engine.begin_read()?;
///     let value = tx.get(&ns, b"key")?;
///     Ok(())
/// }
/// ```
pub trait StorageEngine: Send + Sync {
    /// The transaction type for this engine.
    type Transaction<'a>: Transaction
    where
        Self: 'a;

    /// Open a namespace, creating it if it does not exist.
    ///
    /// `None` opens the default namespace.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidNamespace`] for a rejected name and
    /// [`StorageError::NamespaceLimit`] if creating it would exceed the
    /// engine's maximum number of named namespaces.
    fn open_namespace(&self, name: Option<&str>) -> StorageResult<Namespace>;

    /// Begin a read-only transaction.
    ///
    /// Read transactions provide a consistent snapshot of the database.
    /// Multiple read transactions can run concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot be started.
    fn begin_read(&self) -> StorageResult<Self::Transaction<'_>>;

    /// Begin a read-write transaction.
    ///
    /// Write transactions are exclusive: this call blocks while another write
    /// transaction is in flight.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot be
    /// started, or [`StorageError::MapFull`] if the database has reached its
    /// size ceiling.
    fn begin_write(&self) -> StorageResult<Self::Transaction<'_>>;

    /// Flush any buffered data to durable storage.
    ///
    /// The default implementation does nothing, as most backends handle
    /// durability on commit.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the flush fails.
    fn flush(&self) -> StorageResult<()> {
        Ok(())
    }
}

/// A transaction that provides ACID key-value operations.
///
/// Write transactions must be explicitly committed; dropping one without
/// committing rolls back its changes.
pub trait Transaction {
    /// The cursor type for iteration.
    type Cursor<'a>: Cursor
    where
        Self: 'a;

    /// Get the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NamespaceNotFound`] if the namespace doesn't exist.
    fn get(&self, ns: &Namespace, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Store `value` under `key`.
    ///
    /// When `overwrite` is `false` and the key already holds a value, nothing
    /// is written. A key never holds more than one value.
    ///
    /// # Returns
    ///
    /// Returns `Ok(true)` if the value was written, `Ok(false)` if an existing
    /// value was kept.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] on a read-only transaction and
    /// [`StorageError::NamespaceNotFound`] if the namespace doesn't exist.
    fn put(
        &mut self,
        ns: &Namespace,
        key: &[u8],
        value: &[u8],
        overwrite: bool,
    ) -> StorageResult<bool>;

    /// Delete `key`.
    ///
    /// # Returns
    ///
    /// Returns `Ok(true)` if the key was deleted, `Ok(false)` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] on a read-only transaction and
    /// [`StorageError::NamespaceNotFound`] if the namespace doesn't exist.
    fn delete(&mut self, ns: &Namespace, key: &[u8]) -> StorageResult<bool>;

    /// Create a cursor over all entries of a namespace, in ascending key order.
    ///
    /// The cursor starts before the first key and must be advanced with
    /// [`Cursor::next`] or positioned with [`Cursor::seek`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NamespaceNotFound`] if the namespace doesn't exist.
    fn cursor(&self, ns: &Namespace) -> StorageResult<Self::Cursor<'_>>;

    /// List up to `limit` keys of a namespace in ascending order, starting
    /// just after `after` (or at the first key when `after` is `None`).
    ///
    /// Values are not read. The default implementation walks a cursor;
    /// backends that can skip value copies should override it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NamespaceNotFound`] if the namespace doesn't exist.
    fn keys_after(
        &self,
        ns: &Namespace,
        after: Option<&[u8]>,
        limit: usize,
    ) -> StorageResult<Vec<Vec<u8>>> {
        let mut cursor = self.cursor(ns)?;
        let mut keys = Vec::new();
        if limit == 0 {
            return Ok(keys);
        }
        let mut entry = match after {
            Some(after) => match cursor.seek(after)? {
                Some((key, _)) if key == after => cursor.next()?,
                other => other,
            },
            None => cursor.seek_first()?,
        };
        while let Some((key, _)) = entry {
            keys.push(key);
            if keys.len() >= limit {
                break;
            }
            entry = cursor.next()?;
        }
        Ok(keys)
    }

    /// Report statistics for a namespace without scanning it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NamespaceNotFound`] if the namespace doesn't exist.
    fn stat(&self, ns: &Namespace) -> StorageResult<NamespaceStat>;

    /// Remove every entry of a namespace.
    ///
    /// With `keep_definition` the namespace stays usable and empty; otherwise
    /// the namespace itself is deleted and must be reopened before use.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] on a read-only transaction and
    /// [`StorageError::NamespaceNotFound`] if the namespace doesn't exist.
    fn drop_namespace(&mut self, ns: &Namespace, keep_definition: bool) -> StorageResult<()>;

    /// Commit the transaction, making all changes durable.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the commit fails.
    fn commit(self) -> StorageResult<()>;

    /// Roll back the transaction, discarding all changes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the rollback fails.
    fn rollback(self) -> StorageResult<()>;

    /// Check if this is a read-only transaction.
    fn is_read_only(&self) -> bool;
}

/// A cursor for ordered forward iteration over key-value pairs.
///
/// ```ignore
/// let mut cursor = tx.cursor(&ns)?;
/// cursor.seek(b"prefix")?;
/// while let Some((key, value)) = cursor.current() {
///     // ...
///     cursor.next()?;
/// }
/// ```
pub trait Cursor {
    /// Seek to the first key greater than or equal to `key`.
    ///
    /// Returns the entry at the new position, or `None` if no such key exists.
    fn seek(&mut self, key: &[u8]) -> CursorResult;

    /// Seek to the first entry.
    ///
    /// Returns `None` if the namespace is empty.
    fn seek_first(&mut self) -> CursorResult;

    /// Move to the next entry.
    ///
    /// An unpositioned cursor moves to the first entry. Returns `None` once
    /// the cursor is past the last entry.
    fn next(&mut self) -> CursorResult;

    /// Get the current entry without advancing.
    fn current(&self) -> Option<(&[u8], &[u8])>;
}

/// Implement `StorageEngine` for `Arc<E>` so an engine can be shared between
/// stores and threads.
impl<E: StorageEngine> StorageEngine for Arc<E> {
    type Transaction<'a>
        = E::Transaction<'a>
    where
        Self: 'a;

    fn open_namespace(&self, name: Option<&str>) -> StorageResult<Namespace> {
        (**self).open_namespace(name)
    }

    fn begin_read(&self) -> StorageResult<Self::Transaction<'_>> {
        (**self).begin_read()
    }

    fn begin_write(&self) -> StorageResult<Self::Transaction<'_>> {
        (**self).begin_write()
    }

    fn flush(&self) -> StorageResult<()> {
        (**self).flush()
    }
}
