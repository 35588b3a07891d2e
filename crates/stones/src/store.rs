//! The mapping-style store.
//!
//! [`Store`] presents one namespace of an embedded redb database as an
//! associative container of raw byte keys and structured values. Each
//! operation opens its own transaction scope, so there is no cross-operation
//! atomicity: a bulk operation is atomic, a sequence of point operations is not.
//!
//! # Example
//!
//! ```no_run
//! use stones::Store;
//!
//! # fn main() -> stones::Result<()> {
//! let store: Store<u32> = Store::builder("counters").dir("/tmp/stones").open()?;
//!
//! store.set(b"visits", &1, false)?;
//! assert_eq!(store.get(b"visits")?, Some(1));
//! assert_eq!(store.get_or(b"missing", 0)?, 0);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use stones_core::CodecSet;
use stones_storage::backends::redb::RedbEngine;
use stones_storage::{Cursor, Namespace, NamespaceStat, StorageEngine, StorageError, Transaction};
use tracing::{debug, info};

use crate::builder::StoreBuilder;
use crate::config::StoreConfig;
use crate::error::{escape_key, Error, Result};
use crate::iter::Keys;
use crate::scope::{read_scope, write_scope};

/// A persistent mapping from byte keys to values of type `V`.
///
/// Values cross into storage through the store's codecs, chosen per key.
/// Keys are stored raw and iterate in ascending byte order.
///
/// # Thread Safety
///
/// `Store` is `Send + Sync`; share it behind an `Arc` to use it from several
/// threads. Readers never block; writers are serialized by the engine.
///
/// # Empty values
///
/// A key holding an empty byte sequence counts as absent for [`get`](Self::get)
/// and [`contains`](Self::contains), while [`item`](Self::item) still finds it
/// and tries to decode it. Only custom codecs can produce empty encodings.
pub struct Store<V> {
    name: String,
    path: Option<PathBuf>,
    namespace: Namespace,
    codecs: CodecSet<V>,
    engine: Option<RedbEngine>,
}

impl<V> Store<V> {
    /// Open the store called `name` in the current directory, using the
    /// default namespace and the default codec.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Initialization`] if the database cannot be opened.
    pub fn open(name: impl Into<String>) -> Result<Self>
    where
        V: Serialize + DeserializeOwned + 'static,
    {
        StoreBuilder::new(name).open()
    }

    /// Start configuring the store called `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> StoreBuilder<V> {
        StoreBuilder::new(name)
    }

    /// Open a store from a validated configuration, codecs and initial entries.
    pub(crate) fn open_with_parts(
        config: &StoreConfig,
        codecs: CodecSet<V>,
        initial: Vec<(Vec<u8>, V)>,
    ) -> Result<Self> {
        config.validate()?;
        Self::initialize(config, codecs, initial).map_err(initialization)
    }

    fn initialize(
        config: &StoreConfig,
        codecs: CodecSet<V>,
        initial: Vec<(Vec<u8>, V)>,
    ) -> Result<Self> {
        let (engine, path) = if config.in_memory {
            (RedbEngine::in_memory_with_config(config.engine_config())?, None)
        } else {
            std::fs::create_dir_all(&config.dir).map_err(StorageError::from)?;
            let path = config.path();
            (RedbEngine::open_with_config(&path, config.engine_config())?, Some(path))
        };

        let namespace = engine.open_namespace(config.namespace.as_deref())?;
        // The engine must hand out a working read transaction.
        read_scope(&engine, |tx| Ok(tx.stat(&namespace)?))?;

        let store =
            Self { name: config.name.clone(), path, namespace, codecs, engine: Some(engine) };

        if !initial.is_empty() {
            store.populate(initial, std::iter::empty::<(&str, V)>())?;
        }

        info!(
            store = %store.name,
            namespace = %store.namespace,
            codec = store.codecs.default_codec().name(),
            "opened store"
        );
        Ok(store)
    }

    /// The store name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The namespace name, `None` for the default namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.name()
    }

    /// The database file path, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The codecs values are encoded with.
    pub const fn codecs(&self) -> &CodecSet<V> {
        &self.codecs
    }

    /// Whether [`close`](Self::close) has been called.
    pub const fn is_closed(&self) -> bool {
        self.engine.is_none()
    }

    fn engine(&self) -> Result<&RedbEngine> {
        self.engine.as_ref().ok_or(Error::Closed)
    }

    // Point operations

    /// Get the value stored under `key`.
    ///
    /// Returns `None` if the key is absent or holds an empty value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] if the stored bytes cannot be decoded.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Option<V>> {
        let key = key.as_ref();
        read_scope(self.engine()?, |tx| match tx.get(&self.namespace, key)? {
            Some(bytes) if !bytes.is_empty() => Ok(Some(self.codecs.decode(key, &bytes)?)),
            _ => Ok(None),
        })
    }

    /// Get the value stored under `key`, or `default` if there is none.
    ///
    /// `default` is returned as is; it never passes through a codec.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] if the stored bytes cannot be decoded.
    pub fn get_or(&self, key: impl AsRef<[u8]>, default: V) -> Result<V> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Store `value` under `key`.
    ///
    /// Without `overwrite`, an existing value is kept and `false` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] if the value cannot be encoded, or
    /// [`Error::Storage`] if the write fails.
    pub fn set(&self, key: impl AsRef<[u8]>, value: &V, overwrite: bool) -> Result<bool> {
        let key = key.as_ref();
        let bytes = self.codecs.encode(key, value)?;
        write_scope(self.engine()?, |tx| Ok(tx.put(&self.namespace, key, &bytes, overwrite)?))
    }

    /// Store `value` under `key` unless the key already holds a value.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub fn put(&self, key: impl AsRef<[u8]>, value: &V) -> Result<bool> {
        self.set(key, value, false)
    }

    /// Remove `key`. Returns whether an entry was removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the write fails.
    pub fn delete(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        let key = key.as_ref();
        write_scope(self.engine()?, |tx| Ok(tx.delete(&self.namespace, key)?))
    }

    /// Whether `key` holds a non-empty value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the read fails.
    pub fn contains(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        let key = key.as_ref();
        read_scope(self.engine()?, |tx| {
            Ok(tx.get(&self.namespace, key)?.is_some_and(|bytes| !bytes.is_empty()))
        })
    }

    /// Get the value stored under `key`, failing if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent, or [`Error::Codec`]
    /// if the stored bytes cannot be decoded.
    pub fn item(&self, key: impl AsRef<[u8]>) -> Result<V> {
        let key = key.as_ref();
        read_scope(self.engine()?, |tx| match tx.get(&self.namespace, key)? {
            Some(bytes) => Ok(self.codecs.decode(key, &bytes)?),
            None => Err(Error::KeyNotFound(key.to_vec())),
        })
    }

    /// Store `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub fn set_item(&self, key: impl AsRef<[u8]>, value: &V) -> Result<()> {
        self.set(key, value, true).map(drop)
    }

    // Bulk operations

    /// Write `pairs` followed by `named` entries in one transaction.
    ///
    /// Existing keys are kept, as are later duplicates within the batch.
    /// Returns the number of entries written. If any value fails to encode,
    /// nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] if a value cannot be encoded, or
    /// [`Error::Storage`] if the write fails.
    pub fn populate<K, S, P, N>(&self, pairs: P, named: N) -> Result<usize>
    where
        K: AsRef<[u8]>,
        S: AsRef<str>,
        P: IntoIterator<Item = (K, V)>,
        N: IntoIterator<Item = (S, V)>,
    {
        let entries = pairs
            .into_iter()
            .map(|(key, value)| (key.as_ref().to_vec(), value))
            .chain(named.into_iter().map(|(name, value)| (name.as_ref().as_bytes().to_vec(), value)));

        let written = write_scope(self.engine()?, |tx| {
            let mut written = 0;
            for (key, value) in entries {
                let bytes = self.codecs.encode(&key, &value)?;
                if tx.put(&self.namespace, &key, &bytes, false)? {
                    written += 1;
                }
            }
            Ok(written)
        })?;

        debug!(store = %self.name, namespace = %self.namespace, written, "populated store");
        Ok(written)
    }

    /// Write `pairs` in one transaction; [`populate`](Self::populate) without
    /// named entries.
    ///
    /// # Errors
    ///
    /// See [`populate`](Self::populate).
    pub fn update<K, P>(&self, pairs: P) -> Result<usize>
    where
        K: AsRef<[u8]>,
        P: IntoIterator<Item = (K, V)>,
    {
        self.populate(pairs, std::iter::empty::<(&str, V)>())
    }

    /// Remove every entry. The namespace itself stays.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the write fails.
    pub fn clear(&self) -> Result<()> {
        write_scope(self.engine()?, |tx| Ok(tx.drop_namespace(&self.namespace, true)?))?;
        info!(store = %self.name, namespace = %self.namespace, "cleared store");
        Ok(())
    }

    // Iteration and views

    /// Visit every entry in key order within one read transaction.
    fn scan(&self, mut visit: impl FnMut(Vec<u8>, Vec<u8>) -> Result<()>) -> Result<()> {
        read_scope(self.engine()?, |tx| {
            let mut cursor = tx.cursor(&self.namespace)?;
            while let Some((key, value)) = cursor.next()? {
                visit(key, value)?;
            }
            Ok(())
        })
    }

    /// All keys, in ascending byte order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the read fails.
    pub fn keys(&self) -> Result<Vec<Vec<u8>>> {
        let mut keys = Vec::new();
        self.scan(|key, _| {
            keys.push(key);
            Ok(())
        })?;
        Ok(keys)
    }

    /// All values, in key order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] if a stored value cannot be decoded.
    pub fn values(&self) -> Result<Vec<V>> {
        let mut values = Vec::new();
        self.scan(|key, bytes| {
            values.push(self.codecs.decode(&key, &bytes)?);
            Ok(())
        })?;
        Ok(values)
    }

    /// All entries, in key order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] if a stored value cannot be decoded.
    pub fn items(&self) -> Result<Vec<(Vec<u8>, V)>> {
        let mut items = Vec::new();
        self.scan(|key, bytes| {
            let value = self.codecs.decode(&key, &bytes)?;
            items.push((key, value));
            Ok(())
        })?;
        Ok(items)
    }

    /// Iterate keys lazily over one snapshot.
    ///
    /// The iterator keeps a read transaction open until it is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] on a closed store, or [`Error::Storage`] if
    /// the read transaction cannot be started.
    pub fn iter(&self) -> Result<Keys<'_, RedbEngine>> {
        let tx = self.engine()?.begin_read()?;
        Ok(Keys::new(tx, self.namespace.clone()))
    }

    /// Number of entries, as reported by the engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the read fails.
    pub fn len(&self) -> Result<u64> {
        Ok(self.stat()?.entries)
    }

    /// Whether the store holds no entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the read fails.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Engine statistics for the store's namespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the read fails.
    pub fn stat(&self) -> Result<NamespaceStat> {
        read_scope(self.engine()?, |tx| Ok(tx.stat(&self.namespace)?))
    }

    // Lifecycle

    /// Release the database. Later operations fail with [`Error::Closed`].
    ///
    /// Closing an already closed store does nothing.
    pub fn close(&mut self) {
        if let Some(engine) = self.engine.take() {
            drop(engine);
            info!(store = %self.name, "closed store");
        }
    }
}

/// Turn a failure during construction into [`Error::Initialization`].
fn initialization(err: Error) -> Error {
    let hint = match &err {
        Error::Storage(StorageError::AlreadyOpen(_)) => {
            "close the other handle to this store file or use a different store name"
        }
        Error::Storage(StorageError::Open(_)) => {
            "check that the file is a store database and is not corrupt"
        }
        Error::Storage(StorageError::Io(_)) => "check that the store directory is writable",
        Error::Storage(StorageError::NamespaceLimit { .. }) => {
            "raise max_namespaces or reuse an existing namespace"
        }
        Error::Storage(StorageError::InvalidNamespace { .. }) => {
            "use a non-empty namespace name that does not start with \"__\""
        }
        Error::Storage(StorageError::MapFull { .. }) => "raise max_size or use a different store",
        Error::Codec(_) => "check that the initial entries fit the configured codec",
        _ => "see the underlying error",
    };
    Error::Initialization { reason: err.to_string(), hint }
}

/// Debug form of a raw key.
struct DebugKey<'a>(&'a [u8]);

impl fmt::Debug for DebugKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape_key(self.0))
    }
}

impl<V: fmt::Debug> fmt::Debug for Store<V> {
    /// Prints every entry; meant for debugging small stores.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_closed() {
            return f.write_str("Store(<closed>)");
        }
        match self.items() {
            Ok(items) => {
                f.write_str("Store")?;
                f.debug_map().entries(items.iter().map(|(k, v)| (DebugKey(k), v))).finish()
            }
            Err(err) => write!(f, "Store(<unreadable: {err}>)"),
        }
    }
}
