//! Compact binary codec backed by `bincode`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Codec;
use crate::{CoreError, CoreResult};

/// Largest allocation a single decode may claim, in bytes.
///
/// Length prefixes are trusted only up to this bound, so corrupt or foreign
/// bytes fail to decode instead of exhausting memory.
pub const DECODE_LIMIT: usize = 64 * 1024 * 1024;

/// Compact binary via `bincode`'s serde integration.
///
/// Uses the standard configuration (little endian, variable-length
/// integers), so the encoding of small integers and short strings is a
/// handful of bytes. Unlike CBOR the format is not self-describing: bytes
/// decode only as the exact type that wrote them. A decode never claims more
/// than [`DECODE_LIMIT`] bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BincodeCodec;

impl BincodeCodec {
    /// The name this codec is selected by.
    pub const NAME: &'static str = "bincode";
}

fn config() -> impl bincode::config::Config {
    bincode::config::standard().with_limit::<DECODE_LIMIT>()
}

impl<V> Codec<V> for BincodeCodec
where
    V: Serialize + DeserializeOwned,
{
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn encode(&self, value: &V) -> CoreResult<Vec<u8>> {
        bincode::serde::encode_to_vec(value, config())
            .map_err(|e| CoreError::encoding(Self::NAME, e))
    }

    fn decode(&self, bytes: &[u8]) -> CoreResult<V> {
        let (value, read) =
            bincode::serde::decode_from_slice::<V, _>(bytes, config())
                .map_err(|e| CoreError::decoding(Self::NAME, e, bytes))?;
        if read != bytes.len() {
            return Err(CoreError::decoding(
                Self::NAME,
                format!("{} trailing bytes", bytes.len() - read),
                bytes,
            ));
        }
        Ok(value)
    }
}
