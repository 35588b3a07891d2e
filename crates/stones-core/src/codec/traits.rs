//! The codec strategy trait.

use crate::CoreResult;

/// A strategy for converting values of type `V` to and from raw bytes.
///
/// Codecs sit at the value boundary of a store: keys are always raw bytes,
/// while values cross into storage only through [`Codec::encode`] and come
/// back out through [`Codec::decode`].
///
/// The trait is object safe so a store can hold `Box<dyn Codec<V>>` and swap
/// strategies per key.
///
/// # Example
///
/// ```
/// use stones_core::codec::{Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let bytes = Codec::<u32>::encode(&codec, &42).unwrap();
/// assert_eq!(bytes, b"42");
/// assert_eq!(Codec::<u32>::decode(&codec, &bytes).unwrap(), 42);
/// ```
pub trait Codec<V>: Send + Sync {
    /// The name this codec is selected by.
    fn name(&self) -> &'static str;

    /// Encode a value to bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Encoding`](crate::CoreError::Encoding) if the value
    /// cannot be represented in this format.
    fn encode(&self, value: &V) -> CoreResult<Vec<u8>>;

    /// Decode a value from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Decoding`](crate::CoreError::Decoding) if the bytes
    /// are malformed or do not describe a `V`.
    fn decode(&self, bytes: &[u8]) -> CoreResult<V>;
}

impl<V, C: Codec<V> + ?Sized> Codec<V> for Box<C> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn encode(&self, value: &V) -> CoreResult<Vec<u8>> {
        (**self).encode(value)
    }

    fn decode(&self, bytes: &[u8]) -> CoreResult<V> {
        (**self).decode(bytes)
    }
}
