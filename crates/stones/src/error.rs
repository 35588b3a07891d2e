//! Error types for the store adapter.
//!
//! This module provides the [`enum@Error`] type returned by every
//! [`Store`](crate::Store) operation.

use stones_core::CoreError;
use stones_storage::StorageError;
use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when using a store.
#[derive(Debug, Error)]
pub enum Error {
    /// The store could not be opened.
    ///
    /// Construction aborts with this error; no store handle is returned.
    #[error("failed to initialize store: {reason} (hint: {hint})")]
    Initialization {
        /// What went wrong.
        reason: String,
        /// What the caller can do about it.
        hint: &'static str,
    },

    /// An indexed lookup found no entry for the key.
    #[error("key not found: {}", escape_key(.0))]
    KeyNotFound(Vec<u8>),

    /// The store was closed.
    #[error("store is closed")]
    Closed,

    /// Invalid store configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The storage engine reported an error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A value could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CoreError),
}

impl Error {
    /// Returns `true` if the caller can reasonably handle this error and carry on.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::KeyNotFound(_) | Self::Codec(_) => true,
            Self::Storage(e) => e.is_recoverable(),
            Self::Initialization { .. } | Self::Closed | Self::Config(_) => false,
        }
    }

    /// Returns `true` if the store was used after being closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns `true` if an indexed lookup missed.
    #[must_use]
    pub const fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_))
    }
}

/// Render a raw key the way a byte-string literal would show it.
pub(crate) fn escape_key(key: &[u8]) -> String {
    let escaped: String =
        key.iter().flat_map(|&b| std::ascii::escape_default(b)).map(char::from).collect();
    format!("b\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_not_found_escapes_binary_keys() {
        let err = Error::KeyNotFound(vec![b'a', 0x00, b'"']);
        assert_eq!(err.to_string(), r#"key not found: b"a\x00\"""#);
        assert!(err.is_key_not_found());
        assert!(err.is_recoverable());
    }

    #[test]
    fn storage_errors_keep_their_classification() {
        let err = Error::from(StorageError::AlreadyOpen("t1.redb".into()));
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("t1.redb"));

        let err = Error::from(StorageError::ReadOnly);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn closed_is_fatal() {
        assert!(Error::Closed.is_closed());
        assert!(!Error::Closed.is_recoverable());
    }

    #[test]
    fn initialization_carries_hint() {
        let err = Error::Initialization { reason: "locked".into(), hint: "close the other handle" };
        assert_eq!(
            err.to_string(),
            "failed to initialize store: locked (hint: close the other handle)"
        );
    }
}
