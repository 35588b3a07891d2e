//! Store configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use stones_core::CodecKind;
use stones_storage::backends::redb::{RedbConfig, DEFAULT_MAX_NAMESPACES, DEFAULT_MAX_SIZE};

use crate::error::{Error, Result};

/// File extension of store database files.
pub const FILE_EXTENSION: &str = "redb";

/// Configuration options for opening a store.
///
/// Usually assembled through [`StoreBuilder`](crate::StoreBuilder), which adds
/// the parts that cannot be plain data (custom codecs, an initial payload).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Store name; the database file is `<dir>/<name>.redb`.
    pub name: String,
    /// Directory holding the database file.
    pub dir: PathBuf,
    /// Namespace to open, `None` for the default namespace.
    pub namespace: Option<String>,
    /// Codec for values without an override rule.
    pub codec: CodecKind,
    /// Codec override rules keyed by exact entry key.
    pub codec_overrides: BTreeMap<Vec<u8>, CodecKind>,
    /// Maximum number of named namespaces in the database file.
    pub max_namespaces: usize,
    /// Size ceiling of the database file in bytes, `None` for no ceiling.
    pub max_size: Option<u64>,
    /// Engine page cache size in bytes, `None` for the engine default.
    pub cache_size: Option<usize>,
    /// Keep the database in memory instead of on disk.
    pub in_memory: bool,
}

impl StoreConfig {
    /// Create a configuration for the store called `name` in the current directory.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dir: PathBuf::from("."),
            namespace: None,
            codec: CodecKind::default(),
            codec_overrides: BTreeMap::new(),
            max_namespaces: DEFAULT_MAX_NAMESPACES,
            max_size: Some(DEFAULT_MAX_SIZE),
            cache_size: None,
            in_memory: false,
        }
    }

    /// Set the directory holding the database file.
    #[must_use]
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Open the named namespace instead of the default one.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the default value codec.
    #[must_use]
    pub const fn codec(mut self, codec: CodecKind) -> Self {
        self.codec = codec;
        self
    }

    /// Use `codec` for the entry stored under `key`.
    #[must_use]
    pub fn codec_override(mut self, key: impl Into<Vec<u8>>, codec: CodecKind) -> Self {
        self.codec_overrides.insert(key.into(), codec);
        self
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

    /// Set the engine cache size.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }

    /// Keep the database in memory. Nothing is written to disk.
    #[must_use]
    pub const fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Path of the database file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.{FILE_EXTENSION}", self.name))
    }

    /// Check the configuration before anything touches the disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the store name is empty or is not a plain
    /// file name.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Config("store name is empty".to_string()));
        }
        let plain = Path::new(&self.name).file_name().is_some_and(|f| f == self.name.as_str());
        if !plain {
            return Err(Error::Config(format!(
                "store name '{}' must be a plain file name, use `dir` for the location",
                self.name
            )));
        }
        Ok(())
    }

    /// The engine configuration derived from this store configuration.
    #[must_use]
    pub fn engine_config(&self) -> RedbConfig {
        let mut config = RedbConfig::new().max_namespaces(self.max_namespaces);
        config = match self.max_size {
            Some(size) => config.max_size(size),
            None => config.unbounded(),
        };
        if let Some(cache_size) = self.cache_size {
            config = config.cache_size(cache_size);
        }
        config
    }
}
