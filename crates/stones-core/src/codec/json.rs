//! Self-describing text codec backed by `serde_json`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Codec;
use crate::{CoreError, CoreResult};

/// JSON encoding of values.
///
/// Larger than [`CborCodec`](super::CborCodec) but readable with any
/// tool, which makes it a reasonable choice for stores inspected by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl JsonCodec {
    /// The name this codec is selected by.
    pub const NAME: &'static str = "json";
}

impl<V> Codec<V> for JsonCodec
where
    V: Serialize + DeserializeOwned,
{
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn encode(&self, value: &V) -> CoreResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| CoreError::encoding(Self::NAME, e))
    }

    fn decode(&self, bytes: &[u8]) -> CoreResult<V> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::decoding(Self::NAME, e, bytes))
    }
}
