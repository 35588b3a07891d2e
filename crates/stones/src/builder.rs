//! Builder for opening stores.
//!
//! ```no_run
//! use stones::{CodecKind, Store};
//!
//! # fn main() -> stones::Result<()> {
//! let store: Store<String> = Store::builder("sessions")
//!     .dir("/var/lib/app")
//!     .namespace("active")
//!     .codec(CodecKind::Json)
//!     .entry("motd", "hello".to_string())
//!     .open()?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use stones_core::{Codec, CodecKind, CodecSet};

use crate::config::StoreConfig;
use crate::error::Result;
use crate::store::Store;

/// A builder for [`Store`].
///
/// Obtained from [`Store::builder`]. Configuration that is plain data lives in
/// a [`StoreConfig`]; the builder adds custom codecs and an initial payload
/// that is written in one transaction when the store opens.
pub struct StoreBuilder<V> {
    config: StoreConfig,
    codec: Option<Box<dyn Codec<V>>>,
    key_codecs: Vec<(Vec<u8>, Box<dyn Codec<V>>)>,
    initial: Vec<(Vec<u8>, V)>,
}

impl<V> StoreBuilder<V> {
    /// Create a builder for the store called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_config(StoreConfig::new(name))
    }

    /// Create a builder from an existing configuration.
    #[must_use]
    pub fn from_config(config: StoreConfig) -> Self {
        Self { config, codec: None, key_codecs: Vec::new(), initial: Vec::new() }
    }

    /// The configuration assembled so far.
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Set the directory holding the database file.
    #[must_use]
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config = self.config.dir(dir);
        self
    }

    /// Open the named namespace instead of the default one.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config = self.config.namespace(namespace);
        self
    }

    /// Select a built-in default codec.
    #[must_use]
    pub fn codec(mut self, kind: CodecKind) -> Self {
        self.config = self.config.codec(kind);
        self
    }

    /// Use a custom default codec. Takes precedence over [`codec`](Self::codec).
    #[must_use]
    pub fn custom_codec(mut self, codec: impl Codec<V> + 'static) -> Self {
        self.codec = Some(Box::new(codec));
        self
    }

    /// Use a built-in codec for the entry stored under `key`.
    #[must_use]
    pub fn key_codec(mut self, key: impl Into<Vec<u8>>, kind: CodecKind) -> Self {
        self.config = self.config.codec_override(key, kind);
        self
    }

    /// Use a custom codec for the entry stored under `key`.
    ///
    /// Takes precedence over a [`key_codec`](Self::key_codec) rule for the
    /// same key.
    #[must_use]
    pub fn custom_key_codec(
        mut self,
        key: impl Into<Vec<u8>>,
        codec: impl Codec<V> + 'static,
    ) -> Self {
        self.key_codecs.push((key.into(), Box::new(codec)));
        self
    }

    /// Set the maximum number of named namespaces in the file.
    #[must_use]
    pub fn max_namespaces(mut self, max: usize) -> Self {
        self.config = self.config.max_namespaces(max);
        self
    }

    /// Set the size ceiling of the database file in bytes.
    #[must_use]
    pub fn max_size(mut self, size: u64) -> Self {
        self.config = self.config.max_size(size);
        self
    }

    /// Remove the size ceiling.
    #[must_use]
    pub fn unbounded(mut self) -> Self {
        self.config.max_size = None;
        self
    }

    /// Set the engine page cache size in bytes.
    #[must_use]
    pub fn cache_size(mut self, size: usize) -> Self {
        self.config = self.config.cache_size(size);
        self
    }

    /// Keep the database in memory. Useful for tests.
    #[must_use]
    pub fn in_memory(mut self) -> Self {
        self.config = self.config.in_memory();
        self
    }

    /// Write `pairs` when the store opens.
    ///
    /// Initial entries never replace existing ones. They are written in the
    /// order they were added to the builder.
    #[must_use]
    pub fn populate<K: AsRef<[u8]>>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        self.initial.extend(pairs.into_iter().map(|(k, v)| (k.as_ref().to_vec(), v)));
        self
    }

    /// Write one named entry when the store opens.
    #[must_use]
    pub fn entry(mut self, name: impl AsRef<str>, value: V) -> Self {
        self.initial.push((name.as_ref().as_bytes().to_vec(), value));
        self
    }

    /// Open the store with the configured codecs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) for an invalid store
    /// name and [`Error::Initialization`](crate::Error::Initialization) if the
    /// store cannot be opened or populated.
    pub fn open(self) -> Result<Store<V>>
    where
        V: Serialize + DeserializeOwned + 'static,
    {
        let default = self.codec.unwrap_or_else(|| self.config.codec.build());
        let mut codecs = CodecSet::new(default);
        for (key, kind) in &self.config.codec_overrides {
            codecs = codecs.with_override(key.clone(), kind.build());
        }
        for (key, codec) in self.key_codecs {
            codecs = codecs.with_override(key, codec);
        }
        Store::open_with_parts(&self.config, codecs, self.initial)
    }

    /// Open the store with an explicit codec set.
    ///
    /// Codec settings made on the builder are ignored. This is the way to open
    /// a store for values that do not implement serde's traits.
    ///
    /// # Errors
    ///
    /// See [`open`](Self::open).
    pub fn open_with(self, codecs: CodecSet<V>) -> Result<Store<V>> {
        Store::open_with_parts(&self.config, codecs, self.initial)
    }
}

impl<V> fmt::Debug for StoreBuilder<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreBuilder")
            .field("config", &self.config)
            .field("custom_codec", &self.codec.as_ref().map(|c| c.name()))
            .field("custom_key_codecs", &self.key_codecs.len())
            .field("initial_entries", &self.initial.len())
            .finish()
    }
}
