//! Redb storage engine implementation.
//!
//! This module provides the `RedbEngine` type which implements the
//! `StorageEngine` trait using the Redb embedded database.

use std::path::{Path, PathBuf};

use redb::{Database, TableHandle};
use tracing::{debug, info, warn};

use crate::engine::{Namespace, StorageEngine, StorageError, StorageResult};

use super::internal;
use super::tables::{self, is_named_table};
use super::transaction::RedbTransaction;

/// Default maximum number of named namespaces per database.
pub const DEFAULT_MAX_NAMESPACES: usize = 9;

/// Default size ceiling of a database file (8 TB).
pub const DEFAULT_MAX_SIZE: u64 = 8_000_000_000_000;

/// Configuration options for the Redb storage engine.
#[derive(Debug, Clone, Copy)]
pub struct RedbConfig {
    /// Maximum number of named namespaces the database may hold.
    /// The default namespace does not count against this limit.
    pub max_namespaces: usize,

    /// Size ceiling of the database file in bytes.
    /// Write transactions are refused once the file reaches it.
    /// `None` lets the file grow without bound.
    pub max_size: Option<u64>,

    /// Cache size in bytes.
    /// If not set, uses Redb's default.
    pub cache_size: Option<usize>,
}

impl Default for RedbConfig {
    fn default() -> Self {
        Self {
            max_namespaces: DEFAULT_MAX_NAMESPACES,
            max_size: Some(DEFAULT_MAX_SIZE),
            cache_size: None,
        }
    }
}

impl RedbConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of named namespaces.
    #[must_use]
    pub const fn max_namespaces(mut self, max: usize) -> Self {
        self.max_namespaces = max;
        self
    }

    /// Set the database size ceiling.
    #[must_use]
    pub const fn max_size(mut self, size: u64) -> Self {
        self.max_size = Some(size);
        self
    }

    /// Remove the database size ceiling.
    #[must_use]
    pub const fn unbounded(mut self) -> Self {
        self.max_size = None;
        self
    }

    /// Set the cache size.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }
}

/// A storage engine backed by Redb.
///
/// The database file is locked for as long as the engine lives; dropping the
/// engine releases it.
///
/// # Example
///
/// ```ignore
/// use stones_storage::backends::RedbEngine;
///
/// let engine = RedbEngine::open("my_database.redb")?;
/// let ns = engine.open_namespace(None)?;
///
/// let mut tx = engine.begin_write()?;
/// tx.put(&ns, b"user:1", b"Alice", true)?;
/// tx.commit()?;
/// ```
pub struct RedbEngine {
    /// The underlying Redb database.
    db: Database,
    /// Location of the database file, `None` for in-memory databases.
    path: Option<PathBuf>,
    /// Configuration the engine was opened with.
    config: RedbConfig,
}

impl RedbEngine {
    /// Open or create a database at the given path with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be opened or created.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::open_with_config(path, RedbConfig::default())
    }

    /// Open or create a database at the given path with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AlreadyOpen`] if another handle holds the file
    /// lock, or [`StorageError::Open`] if the file cannot be opened, created,
    /// or is not a valid database.
    pub fn open_with_config(path: impl AsRef<Path>, config: RedbConfig) -> StorageResult<Self> {
        let path = path.as_ref();
        let mut builder = Database::builder();

        if let Some(cache_size) = config.cache_size {
            builder.set_cache_size(cache_size);
        }

        let db = builder.create(path).map_err(|e| match e {
            redb::DatabaseError::DatabaseAlreadyOpen => {
                StorageError::AlreadyOpen(path.display().to_string())
            }
            other => StorageError::Open(format!("{}: {other}", path.display())),
        })?;

        debug!(path = %path.display(), ?config, "opened redb database");
        Ok(Self { db, path: Some(path.to_path_buf()), config })
    }

    /// Create an in-memory database for testing.
    ///
    /// The database will be lost when the engine is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be created.
    pub fn in_memory() -> StorageResult<Self> {
        Self::in_memory_with_config(RedbConfig::default())
    }

    /// Create an in-memory database with custom configuration.
    ///
    /// The size ceiling does not apply to in-memory databases.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be created.
    pub fn in_memory_with_config(config: RedbConfig) -> StorageResult<Self> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| StorageError::Open(e.to_string()))?;

        Ok(Self { db, path: None, config })
    }

    /// The database file path, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The configuration the engine was opened with.
    pub const fn config(&self) -> &RedbConfig {
        &self.config
    }

    /// Names of all namespaces present in the database, default excluded.
    ///
    /// # Errors
    ///
    /// Returns an error if the table list cannot be read.
    pub fn namespace_names(&self) -> StorageResult<Vec<String>> {
        let tx = self.db.begin_read().map_err(|e| StorageError::Transaction(e.to_string()))?;
        let names = tx
            .list_tables()
            .map_err(internal)?
            .map(|handle| handle.name().to_string())
            .filter(|name| is_named_table(name))
            .collect();
        Ok(names)
    }

    /// Refuse writes once the file has reached the size ceiling.
    fn check_size_ceiling(&self) -> StorageResult<()> {
        let (Some(path), Some(ceiling)) = (&self.path, self.config.max_size) else {
            return Ok(());
        };

        let size = std::fs::metadata(path)?.len();
        if size >= ceiling {
            warn!(path = %path.display(), size, ceiling, "database reached its size ceiling");
            return Err(StorageError::MapFull { size, ceiling });
        }
        Ok(())
    }
}

impl std::fmt::Debug for RedbEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbEngine")
            .field("path", &self.path)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl StorageEngine for RedbEngine {
    type Transaction<'a> = RedbTransaction;

    fn open_namespace(&self, name: Option<&str>) -> StorageResult<Namespace> {
        let ns = Namespace::from_option(name)?;
        let table = tables::table_name(&ns);

        let tx = self.db.begin_write().map_err(|e| StorageError::Transaction(e.to_string()))?;

        let existing: Vec<String> =
            tx.list_tables().map_err(internal)?.map(|handle| handle.name().to_string()).collect();
        if existing.iter().any(|name| name == table) {
            drop(tx.abort());
            return Ok(ns);
        }

        if !ns.is_default() {
            let named = existing.iter().filter(|name| is_named_table(name)).count();
            if named >= self.config.max_namespaces {
                drop(tx.abort());
                return Err(StorageError::NamespaceLimit { max: self.config.max_namespaces });
            }
        }

        // Opening a table inside a write transaction creates it.
        drop(tx.open_table(tables::definition(&ns)).map_err(internal)?);
        tx.commit().map_err(|e| StorageError::Transaction(e.to_string()))?;

        info!(namespace = %ns, "created namespace");
        Ok(ns)
    }

    fn begin_read(&self) -> StorageResult<Self::Transaction<'_>> {
        let tx = self.db.begin_read().map_err(|e| StorageError::Transaction(e.to_string()))?;
        Ok(RedbTransaction::new_read(tx))
    }

    fn begin_write(&self) -> StorageResult<Self::Transaction<'_>> {
        self.check_size_ceiling()?;
        let tx = self.db.begin_write().map_err(|e| StorageError::Transaction(e.to_string()))?;
        Ok(RedbTransaction::new_write(tx))
    }
}
