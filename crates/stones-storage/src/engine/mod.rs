//! Storage engine traits and abstractions.
//!
//! This module defines the contract a storage backend must fulfil:
//!
//! - [`StorageEngine`] - Main entry point for namespaces and transactions
//! - [`Transaction`] - ACID transaction bound to the engine it came from
//! - [`Cursor`] - Ordered iteration over key-value pairs
//! - [`Namespace`] - Handle to one sub-table of the physical database
//!
//! # Error Handling
//!
//! All operations return [`StorageResult<T>`] which is an alias for
//! `Result<T, StorageError>`. See [`StorageError`] for the possible error variants.

mod error;
mod namespace;
mod traits;

pub use error::{StorageError, StorageResult};
pub use namespace::{Namespace, NamespaceStat};
pub use traits::{Cursor, CursorResult, KeyValue, StorageEngine, Transaction};
