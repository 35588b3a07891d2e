//! stones core
//!
//! Value codecs shared by the `stones` store adapter.
//!
//! Keys in a store are raw bytes. Values are application types that cross into
//! storage through a [`Codec`](codec::Codec): the store encodes on write and
//! decodes on read, and never looks inside the bytes itself.
//!
//! # Example
//!
//! ```
//! use stones_core::codec::{CodecKind, CodecSet};
//!
//! let codecs = CodecSet::<Vec<String>>::new(CodecKind::Cbor.build())
//!     .with_override(b"index".to_vec(), CodecKind::Json.build());
//!
//! let value = vec!["a".to_string(), "b".to_string()];
//! let bytes = codecs.encode(b"index", &value).unwrap();
//! assert_eq!(bytes, br#"["a","b"]"#);
//! assert_eq!(codecs.decode(b"index", &bytes).unwrap(), value);
//! ```

#![deny(clippy::unwrap_used)]

pub mod codec;
pub mod error;

pub use codec::{BincodeCodec, CborCodec, Codec, CodecKind, CodecSet, JsonCodec};
pub use error::{CoreError, CoreResult};
