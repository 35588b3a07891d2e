//! Shared helpers for store integration tests.

#![allow(dead_code)]

use serde::de::DeserializeOwned;
use serde::Serialize;
use stones::{Codec, CoreError, Store};
use tempfile::TempDir;

/// Install a test-friendly tracing subscriber. Filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A fresh temporary directory for on-disk stores.
pub fn temp_dir() -> TempDir {
    init_tracing();
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Open the store `name` inside `dir` with default settings.
pub fn open_store<V>(dir: &TempDir, name: &str) -> Store<V>
where
    V: Serialize + DeserializeOwned + 'static,
{
    Store::builder(name).dir(dir.path()).open().expect("failed to open store")
}

/// Stores strings as their raw UTF-8 bytes, so an empty string encodes to
/// an empty byte sequence.
pub struct Utf8Codec;

impl Codec<String> for Utf8Codec {
    fn name(&self) -> &'static str {
        "utf8"
    }

    fn encode(&self, value: &String) -> Result<Vec<u8>, CoreError> {
        Ok(value.as_bytes().to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, CoreError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| CoreError::decoding("utf8", e, bytes))
    }
}

/// Stores byte vectors exactly as given, with no framing.
pub struct RawCodec;

impl Codec<Vec<u8>> for RawCodec {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn encode(&self, value: &Vec<u8>) -> Result<Vec<u8>, CoreError> {
        Ok(value.clone())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>, CoreError> {
        Ok(bytes.to_vec())
    }
}
