//! A default codec plus per-key overrides.

use std::collections::BTreeMap;
use std::fmt;

use super::Codec;
use crate::CoreResult;

/// The codecs a store uses, resolved per entry key.
///
/// Most entries go through the default codec. Override rules map an exact key
/// to a different codec, so a handful of entries (say, a JSON manifest next to
/// binary records) can use their own format.
pub struct CodecSet<V> {
    default: Box<dyn Codec<V>>,
    overrides: BTreeMap<Vec<u8>, Box<dyn Codec<V>>>,
}

impl<V> CodecSet<V> {
    /// Create a set with only a default codec.
    pub fn new(default: Box<dyn Codec<V>>) -> Self {
        Self { default, overrides: BTreeMap::new() }
    }

    /// Route the entry stored under `key` through `codec`.
    ///
    /// Replaces any earlier rule for the same key.
    #[must_use]
    pub fn with_override(mut self, key: impl Into<Vec<u8>>, codec: Box<dyn Codec<V>>) -> Self {
        self.overrides.insert(key.into(), codec);
        self
    }

    /// The codec responsible for `key`.
    pub fn for_key(&self, key: &[u8]) -> &dyn Codec<V> {
        self.overrides.get(key).map_or(self.default.as_ref(), |c| c.as_ref())
    }

    /// The default codec.
    pub fn default_codec(&self) -> &dyn Codec<V> {
        self.default.as_ref()
    }

    /// Number of override rules.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Encode `value` for storage under `key`.
    ///
    /// # Errors
    ///
    /// Propagates the selected codec's encoding error.
    pub fn encode(&self, key: &[u8], value: &V) -> CoreResult<Vec<u8>> {
        self.for_key(key).encode(value)
    }

    /// Decode the bytes stored under `key`.
    ///
    /// # Errors
    ///
    /// Propagates the selected codec's decoding error.
    pub fn decode(&self, key: &[u8], bytes: &[u8]) -> CoreResult<V> {
        self.for_key(key).decode(bytes)
    }
}

impl<V> fmt::Debug for CodecSet<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecSet")
            .field("default", &self.default.name())
            .field(
                "overrides",
                &self
                    .overrides
                    .iter()
                    .map(|(k, c)| (String::from_utf8_lossy(k).into_owned(), c.name()))
                    .collect::<BTreeMap<_, _>>(),
            )
            .finish()
    }
}
