//! Value codecs.
//!
//! A codec converts structured values to the raw bytes stored by the engine
//! and back. Stores pick one by name through [`CodecKind`] or accept any
//! [`Codec`] implementation directly.
//!
//! # Built-in Codecs
//!
//! - [`CborCodec`] - compact self-describing binary (default)
//! - [`BincodeCodec`] - compact binary, bound to the exact value type
//! - [`JsonCodec`] - self-describing JSON text
//!
//! # Per-key Overrides
//!
//! [`CodecSet`] pairs a default codec with override rules keyed by entry key.

mod binary;
mod cbor;
mod json;
mod kind;
mod set;
mod traits;


pub use binary::{BincodeCodec, DECODE_LIMIT};
pub use cbor::CborCodec;
pub use json::JsonCodec;
pub use kind::CodecKind;
pub use set::CodecSet;
pub use traits::Codec;
