//! Storage error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database could not be opened or created.
    #[error("failed to open database: {0}")]
    Open(String),

    /// The database file is locked by another handle.
    #[error("database is already open: {0}")]
    AlreadyOpen(String),

    /// A namespace does not exist.
    #[error("namespace not found: {0}")]
    NamespaceNotFound(String),

    /// A namespace name was rejected.
    #[error("invalid namespace name '{name}': {reason}")]
    InvalidNamespace {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Creating another namespace would exceed the configured maximum.
    #[error("namespace limit reached: at most {max} named namespaces per database")]
    NamespaceLimit {
        /// The configured maximum.
        max: usize,
    },

    /// The database file has reached its size ceiling.
    #[error("database is full: {size} bytes used of {ceiling} byte ceiling")]
    MapFull {
        /// Current file size in bytes.
        size: u64,
        /// The configured ceiling in bytes.
        ceiling: u64,
    },

    /// A transaction could not be started or committed.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// A write was attempted through a read-only transaction.
    #[error("cannot write in a read-only transaction")]
    ReadOnly,

    /// The engine reported an unexpected failure.
    #[error("internal storage error: {0}")]
    Internal(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Returns `true` if retrying the operation later may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::AlreadyOpen(_) | Self::Transaction(_))
    }

    /// Returns `true` if this error reports a missing namespace.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NamespaceNotFound(_))
    }
}
