//! Redb transaction implementation.
//!
//! This module provides the `RedbTransaction` type which implements the
//! `Transaction` trait for both read-only and read-write transactions.
//!
//! # Memory-Efficient Cursors
//!
//! The cursor implementation uses batched streaming to avoid loading entire
//! namespaces into memory. It loads entries in batches (default 1000
//! entries), fetching the next batch on demand as the cursor advances.

use std::ops::Bound;

use redb::{
    ReadTransaction, ReadableTable, ReadableTableMetadata, TableHandle, WriteTransaction,
};

use crate::engine::{
    Cursor, CursorResult, KeyValue, Namespace, NamespaceStat, StorageError, StorageResult,
    Transaction,
};

use super::internal;
use super::tables::{definition, table_name};

/// Default batch size for cursor operations.
const DEFAULT_BATCH_SIZE: usize = 1000;

/// A transaction for the Redb storage engine.
///
/// Note: We allow the `large_enum_variant` lint here because boxing the
/// `WriteTransaction` would add indirection overhead for every operation,
/// and transactions are typically short-lived.
#[allow(clippy::large_enum_variant)]
pub enum RedbTransaction {
    /// A read-only transaction.
    Read(ReadTransaction),
    /// A read-write transaction.
    Write(WriteTransaction),
}

impl RedbTransaction {
    /// Create a new read-only transaction.
    pub const fn new_read(tx: ReadTransaction) -> Self {
        Self::Read(tx)
    }

    /// Create a new read-write transaction.
    pub const fn new_write(tx: WriteTransaction) -> Self {
        Self::Write(tx)
    }

    /// Whether the table backing `ns` exists in this transaction's view.
    fn namespace_exists(&self, ns: &Namespace) -> StorageResult<bool> {
        let table = table_name(ns);
        let found = match self {
            Self::Read(tx) => tx.list_tables().map_err(internal)?.any(|h| h.name() == table),
            Self::Write(tx) => tx.list_tables().map_err(internal)?.any(|h| h.name() == table),
        };
        Ok(found)
    }

    /// Fail unless `ns` exists.
    ///
    /// Write transactions create tables on open, so they check first.
    fn require_namespace(&self, ns: &Namespace) -> StorageResult<()> {
        if self.namespace_exists(ns)? {
            Ok(())
        } else {
            Err(StorageError::NamespaceNotFound(ns.to_string()))
        }
    }

    /// Fetch up to `limit` entries starting at `start`, in ascending key order.
    ///
    /// `pick` turns each raw entry into the collected item, so callers that
    /// only need keys never copy values.
    fn fetch_batch<R>(
        &self,
        ns: &Namespace,
        start: Bound<&[u8]>,
        limit: usize,
        pick: fn(&[u8], &[u8]) -> R,
    ) -> StorageResult<Vec<R>> {
        match self {
            Self::Read(tx) => match tx.open_table(definition(ns)) {
                Ok(t) => collect_batch(&t, start, limit, pick),
                Err(redb::TableError::TableDoesNotExist(_)) => {
                    Err(StorageError::NamespaceNotFound(ns.to_string()))
                }
                Err(e) => Err(internal(e)),
            },
            Self::Write(tx) => {
                self.require_namespace(ns)?;
                let t = tx.open_table(definition(ns)).map_err(internal)?;
                collect_batch(&t, start, limit, pick)
            }
        }
    }
}

/// Collect one batch of entries from any readable table.
fn collect_batch<T, R>(
    table: &T,
    start: Bound<&[u8]>,
    limit: usize,
    pick: fn(&[u8], &[u8]) -> R,
) -> StorageResult<Vec<R>>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    let range = match start {
        Bound::Included(key) | Bound::Excluded(key) => table.range(key..),
        Bound::Unbounded => table.iter(),
    }
    .map_err(internal)?;
    let skip = match start {
        Bound::Excluded(key) => Some(key),
        _ => None,
    };

    let mut entries = Vec::with_capacity(limit.min(1024));
    for result in range {
        if entries.len() >= limit {
            break;
        }
        let (k, v) = result.map_err(internal)?;
        if skip.is_some_and(|s| s == k.value()) {
            continue;
        }
        entries.push(pick(k.value(), v.value()));
    }
    Ok(entries)
}

fn entry(key: &[u8], value: &[u8]) -> KeyValue {
    (key.to_vec(), value.to_vec())
}

fn key_only(key: &[u8], _value: &[u8]) -> Vec<u8> {
    key.to_vec()
}

/// Read the statistics of any table.
fn table_stat<T: ReadableTableMetadata>(table: &T) -> StorageResult<NamespaceStat> {
    let stats = table.stats().map_err(internal)?;
    Ok(NamespaceStat {
        entries: table.len().map_err(internal)?,
        depth: stats.tree_height(),
        leaf_pages: stats.leaf_pages(),
        branch_pages: stats.branch_pages(),
        stored_bytes: stats.stored_bytes(),
    })
}

impl std::fmt::Debug for RedbTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self {
            Self::Read(_) => "read",
            Self::Write(_) => "write",
        };
        f.debug_struct("RedbTransaction").field("mode", &mode).finish_non_exhaustive()
    }
}

impl Transaction for RedbTransaction {
    type Cursor<'a>
        = RedbCursor<'a>
    where
        Self: 'a;

    fn get(&self, ns: &Namespace, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        match self {
            Self::Read(tx) => match tx.open_table(definition(ns)) {
                Ok(t) => {
                    let value = t.get(key).map_err(internal)?.map(|v| v.value().to_vec());
                    Ok(value)
                }
                Err(redb::TableError::TableDoesNotExist(_)) => {
                    Err(StorageError::NamespaceNotFound(ns.to_string()))
                }
                Err(e) => Err(internal(e)),
            },
            Self::Write(tx) => {
                self.require_namespace(ns)?;
                let t = tx.open_table(definition(ns)).map_err(internal)?;
                let value = t.get(key).map_err(internal)?.map(|v| v.value().to_vec());
                Ok(value)
            }
        }
    }

    fn put(
        &mut self,
        ns: &Namespace,
        key: &[u8],
        value: &[u8],
        overwrite: bool,
    ) -> StorageResult<bool> {
        self.require_namespace(ns)?;
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let mut t = tx.open_table(definition(ns)).map_err(internal)?;
                if !overwrite {
                    let exists = t.get(key).map_err(internal)?.is_some();
                    if exists {
                        return Ok(false);
                    }
                }
                t.insert(key, value).map_err(internal)?;
                Ok(true)
            }
        }
    }

    fn delete(&mut self, ns: &Namespace, key: &[u8]) -> StorageResult<bool> {
        self.require_namespace(ns)?;
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let mut t = tx.open_table(definition(ns)).map_err(internal)?;
                let removed = t.remove(key).map_err(internal)?.is_some();
                Ok(removed)
            }
        }
    }

    fn cursor(&self, ns: &Namespace) -> StorageResult<Self::Cursor<'_>> {
        self.require_namespace(ns)?;
        Ok(RedbCursor::new(self, ns.clone(), DEFAULT_BATCH_SIZE))
    }

    fn keys_after(
        &self,
        ns: &Namespace,
        after: Option<&[u8]>,
        limit: usize,
    ) -> StorageResult<Vec<Vec<u8>>> {
        let start = after.map_or(Bound::Unbounded, Bound::Excluded);
        self.fetch_batch(ns, start, limit, key_only)
    }

    fn stat(&self, ns: &Namespace) -> StorageResult<NamespaceStat> {
        match self {
            Self::Read(tx) => match tx.open_table(definition(ns)) {
                Ok(t) => table_stat(&t),
                Err(redb::TableError::TableDoesNotExist(_)) => {
                    Err(StorageError::NamespaceNotFound(ns.to_string()))
                }
                Err(e) => Err(internal(e)),
            },
            Self::Write(tx) => {
                self.require_namespace(ns)?;
                let t = tx.open_table(definition(ns)).map_err(internal)?;
                table_stat(&t)
            }
        }
    }

    fn drop_namespace(&mut self, ns: &Namespace, keep_definition: bool) -> StorageResult<()> {
        self.require_namespace(ns)?;
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                tx.delete_table(definition(ns)).map_err(internal)?;
                if keep_definition {
                    // Recreate the table empty within the same transaction.
                    drop(tx.open_table(definition(ns)).map_err(internal)?);
                }
                Ok(())
            }
        }
    }

    fn commit(self) -> StorageResult<()> {
        match self {
            // Read transactions are released on drop.
            Self::Read(_) => Ok(()),
            Self::Write(tx) => tx.commit().map_err(|e| StorageError::Transaction(e.to_string())),
        }
    }

    fn rollback(self) -> StorageResult<()> {
        match self {
            Self::Read(_) => Ok(()),
            Self::Write(tx) => tx.abort().map_err(|e| StorageError::Transaction(e.to_string())),
        }
    }

    fn is_read_only(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}

/// A memory-efficient forward cursor over one namespace.
///
/// At any time the cursor holds at most `batch_size` entries in memory, plus
/// the current entry. When a batch runs out, the next one is fetched starting
/// just after the last key seen.
pub struct RedbCursor<'a> {
    /// Reference to the transaction for fetching additional batches.
    tx: &'a RedbTransaction,
    /// The namespace being iterated.
    ns: Namespace,
    /// Current batch of entries.
    batch: Vec<KeyValue>,
    /// Position within the current batch.
    batch_position: Option<usize>,
    /// Maximum entries per batch.
    batch_size: usize,
    /// Whether there may be more entries after the current batch.
    has_more: bool,
    /// Whether the cursor has been positioned at least once.
    started: bool,
}

impl<'a> RedbCursor<'a> {
    /// Create a new streaming cursor.
    ///
    /// The cursor starts unpositioned. Call `seek_first()`, `seek()` or
    /// `next()` to position it.
    pub fn new(tx: &'a RedbTransaction, ns: Namespace, batch_size: usize) -> Self {
        Self {
            tx,
            ns,
            batch: Vec::new(),
            batch_position: None,
            batch_size: batch_size.max(1),
            has_more: true,
            started: false,
        }
    }

    /// Replace the batch with entries starting at `start`, positioned on its
    /// first entry.
    fn load_batch(&mut self, start: Bound<&[u8]>) -> CursorResult {
        self.started = true;
        self.batch = self.tx.fetch_batch(&self.ns, start, self.batch_size, entry)?;
        self.has_more = self.batch.len() >= self.batch_size;
        self.batch_position = if self.batch.is_empty() { None } else { Some(0) };
        Ok(self.current_entry())
    }

    /// Load the batch following the current one.
    fn load_next_batch(&mut self) -> CursorResult {
        if !self.has_more {
            self.batch_position = None;
            return Ok(None);
        }
        let Some((after, _)) = self.batch.last().cloned() else {
            self.batch_position = None;
            return Ok(None);
        };
        self.load_batch(Bound::Excluded(after.as_slice()))
    }

    fn current_entry(&self) -> Option<KeyValue> {
        self.batch_position.and_then(|pos| self.batch.get(pos).cloned())
    }
}

impl Cursor for RedbCursor<'_> {
    fn seek(&mut self, key: &[u8]) -> CursorResult {
        self.load_batch(Bound::Included(key))
    }

    fn seek_first(&mut self) -> CursorResult {
        self.load_batch(Bound::Unbounded)
    }

    fn next(&mut self) -> CursorResult {
        if !self.started {
            return self.seek_first();
        }
        match self.batch_position {
            // Exhausted: stay past the end.
            None => Ok(None),
            Some(pos) if pos + 1 < self.batch.len() => {
                self.batch_position = Some(pos + 1);
                Ok(self.current_entry())
            }
            Some(_) => self.load_next_batch(),
        }
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        self.batch_position
            .and_then(|pos| self.batch.get(pos))
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}
