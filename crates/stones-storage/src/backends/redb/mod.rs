//! Redb storage backend.
//!
//! This module provides a storage backend implementation using Redb,
//! a pure-Rust embedded database with ACID transactions, MVCC readers and a
//! single writer.
//!
//! Each [`Namespace`](crate::Namespace) maps to its own Redb table, so
//! namespaces are separate B-trees inside one file rather than key prefixes
//! in a shared table.
//!
//! # Example
//!
//! ```ignore
//! use stones_storage::backends::redb::{RedbConfig, RedbEngine};
//!
//! let config = RedbConfig::new()
//!     .max_namespaces(4)
//!     .cache_size(64 * 1024 * 1024);
//!
//! let engine = RedbEngine::open_with_config("store.redb", config)?;
//! let sessions = engine.open_namespace(Some("sessions"))?;
//! ```
//!
//! # In-Memory Databases
//!
//! For testing, you can create an in-memory database that doesn't persist:
//!
//! ```ignore
//! let engine = RedbEngine::in_memory()?;
//! ```

mod engine;
pub mod tables;
mod transaction;

pub use engine::{RedbConfig, RedbEngine, DEFAULT_MAX_NAMESPACES, DEFAULT_MAX_SIZE};
pub use transaction::{RedbCursor, RedbTransaction};

use crate::engine::StorageError;

/// Wrap an unexpected Redb error.
fn internal(e: impl std::fmt::Display) -> StorageError {
    StorageError::Internal(e.to_string())
}
