//! Namespace handles.

use std::fmt;
use std::sync::Arc;

use super::{StorageError, StorageResult};

/// Prefix reserved for engine-internal table names.
pub(crate) const RESERVED_PREFIX: &str = "__";

/// Longest accepted namespace name, in bytes.
const MAX_NAME_LEN: usize = 255;

/// A handle to one namespace (sub-table) of a physical database.
///
/// Namespaces are isolated keyspaces sharing one file. A handle is cheap to
/// clone; it only names the namespace, so every transaction method takes the
/// handle it operates on.
///
/// Handles are normally obtained from
/// [`StorageEngine::open_namespace`](super::StorageEngine::open_namespace),
/// which creates the namespace if needed. A handle built directly refers to a
/// namespace that may not exist yet; operations on it then fail with
/// [`StorageError::NamespaceNotFound`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Namespace {
    name: Option<Arc<str>>,
}

impl Namespace {
    /// A handle to the default (unnamed) namespace.
    #[must_use]
    pub const fn unnamed() -> Self {
        Self { name: None }
    }

    /// A handle to the namespace called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidNamespace`] if the name is empty, too
    /// long, contains a NUL byte, or starts with the reserved `__` prefix.
    pub fn named(name: &str) -> StorageResult<Self> {
        let reason = if name.is_empty() {
            Some("empty")
        } else if name.len() > MAX_NAME_LEN {
            Some("longer than 255 bytes")
        } else if name.contains('\0') {
            Some("contains a NUL byte")
        } else if name.starts_with(RESERVED_PREFIX) {
            Some("the '__' prefix is reserved")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(StorageError::InvalidNamespace { name: name.to_string(), reason }),
            None => Ok(Self { name: Some(Arc::from(name)) }),
        }
    }

    /// Build a handle from an optional name, `None` meaning the default namespace.
    ///
    /// # Errors
    ///
    /// See [`Namespace::named`].
    pub fn from_option(name: Option<&str>) -> StorageResult<Self> {
        name.map_or_else(|| Ok(Self::unnamed()), Self::named)
    }

    /// The namespace name, `None` for the default namespace.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether this is the default namespace.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.name.is_none()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("<default>"))
    }
}

/// Engine-reported statistics for one namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamespaceStat {
    /// Number of entries.
    pub entries: u64,
    /// Height of the B-tree.
    pub depth: u32,
    /// Number of leaf pages.
    pub leaf_pages: u64,
    /// Number of branch pages.
    pub branch_pages: u64,
    /// Bytes of stored keys and values.
    pub stored_bytes: u64,
}
