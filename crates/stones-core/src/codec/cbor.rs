//! Compact self-describing binary codec backed by `ciborium`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Codec;
use crate::{CoreError, CoreResult};

/// CBOR encoding of values, the default.
///
/// Nearly as small as [`BincodeCodec`](super::BincodeCodec), but every item
/// carries its own type and length, so stored values can be read back as a
/// different but compatible type (a struct as a map, say) and inspected
/// without knowing the writer's type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CborCodec;

impl CborCodec {
    /// The name this codec is selected by.
    pub const NAME: &'static str = "cbor";
}

impl<V> Codec<V> for CborCodec
where
    V: Serialize + DeserializeOwned,
{
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn encode(&self, value: &V) -> CoreResult<Vec<u8>> {
        let mut out = Vec::new();
        ciborium::into_writer(value, &mut out).map_err(|e| CoreError::encoding(Self::NAME, e))?;
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> CoreResult<V> {
        let mut remaining = bytes;
        let value = ciborium::from_reader(&mut remaining)
            .map_err(|e| CoreError::decoding(Self::NAME, e, bytes))?;
        if !remaining.is_empty() {
            return Err(CoreError::decoding(
                Self::NAME,
                format!("{} trailing bytes", remaining.len()),
                bytes,
            ));
        }
        Ok(value)
    }
}
