//! # stones
//!
//! A mapping-style store over an embedded, transactional key-value engine.
//!
//! A [`Store`] treats one namespace of a redb database file as an ordinary
//! associative container: get, set, delete, membership, length, iteration,
//! bulk population and clearing. Every operation runs in its own correctly
//! scoped read or write transaction, so callers never manage transactions.
//!
//! Keys are raw bytes. Values are any type a [`Codec`] can encode; the
//! built-in codecs cover every serde type.
//!
//! # Quick Start
//!
//! ```no_run
//! use stones::Store;
//!
//! # fn main() -> stones::Result<()> {
//! let mut store: Store<Vec<String>> = Store::builder("tags").dir("data").open()?;
//!
//! store.set(b"post:1", &vec!["rust".to_string()], false)?;
//! store.update([(b"post:2", vec!["db".to_string()])])?;
//!
//! for key in store.iter()? {
//!     println!("{:?}", String::from_utf8_lossy(&key?));
//! }
//! assert_eq!(store.len()?, 2);
//!
//! store.close();
//! assert!(store.get(b"post:1").unwrap_err().is_closed());
//! # Ok(())
//! # }
//! ```
//!
//! # Namespaces
//!
//! One file holds a default namespace plus up to nine named ones (see
//! [`StoreBuilder::max_namespaces`]). Each store handle works on exactly one
//! namespace; open several handles to work on several.
//!
//! # Modules
//!
//! - [`config`] - Store configuration
//! - [`error`] - The [`enum@Error`] type
//!
//! The codec layer is re-exported from `stones-core` and the engine contract
//! lives in `stones-storage`.

#![deny(clippy::unwrap_used)]

mod builder;
pub mod config;
pub mod error;
mod iter;
mod scope;
mod store;

pub use builder::StoreBuilder;
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use iter::Keys;
pub use store::Store;

pub use stones_core::{
    BincodeCodec, CborCodec, Codec, CodecKind, CodecSet, CoreError, JsonCodec,
};
pub use stones_storage::{NamespaceStat, StorageError};
