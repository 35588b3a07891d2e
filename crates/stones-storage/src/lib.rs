//! stones storage
//!
//! This crate provides the storage engine contract consumed by the `stones`
//! store adapter, and the redb backend that fulfils it.
//!
//! # Overview
//!
//! One physical database file hosts a small, fixed number of independent
//! namespaces (sub-tables). All access goes through transactions: read
//! transactions see a consistent snapshot and may overlap freely, write
//! transactions are serialized by the engine.
//!
//! # Core Traits
//!
//! - [`StorageEngine`] - Opens namespaces and begins transactions
//! - [`Transaction`] - Namespace-scoped get/put/delete/stat/drop operations
//! - [`Cursor`] - Ordered forward iteration over a namespace
//!
//! # Error Handling
//!
//! All storage operations return [`StorageResult<T>`], which is an alias for
//! `Result<T, StorageError>`.
//!
//! # Example
//!
//! ```ignore
//! use stones_storage::{StorageEngine, Transaction};
//! use stones_storage::backends::RedbEngine;
//!
//! let engine = RedbEngine::open("cache.redb")?;
//! let users = engine.open_namespace(Some("users"))?;
//!
//! let mut tx = engine.begin_write()?;
//! tx.put(&users, b"user:1", b"Alice", false)?;
//! tx.commit()?;
//!
//! let tx = engine.begin_read()?;
//! assert_eq!(tx.get(&users, b"user:1")?, Some(b"Alice".to_vec()));
//! ```

#![deny(clippy::unwrap_used)]

pub mod backends;
pub mod engine;

pub use engine::{
    Cursor, CursorResult, KeyValue, Namespace, NamespaceStat, StorageEngine, StorageError,
    StorageResult, Transaction,
};
