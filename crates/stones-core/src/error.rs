//! Error types for the core crate.

use thiserror::Error;

/// Maximum length for input display in error messages.
const MAX_INPUT_DISPLAY_LEN: usize = 32;

/// Result type for codec operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while encoding or decoding values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A value could not be encoded.
    #[error("{codec} encoding error: {message}")]
    Encoding {
        /// The codec that failed.
        codec: &'static str,
        /// The underlying error message.
        message: String,
    },

    /// Stored bytes could not be decoded into the expected value type.
    #[error("{codec} decoding error: {message}{}", input.as_ref().map(|i| format!(" (input: {i})")).unwrap_or_default())]
    Decoding {
        /// The codec that failed.
        codec: &'static str,
        /// The underlying error message.
        message: String,
        /// A hex preview of the offending bytes.
        input: Option<String>,
    },

    /// No codec is registered under the requested name.
    #[error("unknown codec '{0}' (expected one of: cbor, bincode, json)")]
    UnknownCodec(String),
}

impl CoreError {
    /// Creates an encoding error.
    #[must_use]
    pub fn encoding(codec: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Encoding { codec, message: message.to_string() }
    }

    /// Creates a decoding error with a preview of the bytes that failed.
    ///
    /// The preview is truncated to 32 bytes.
    #[must_use]
    pub fn decoding(codec: &'static str, message: impl std::fmt::Display, input: &[u8]) -> Self {
        let preview: String =
            input.iter().take(MAX_INPUT_DISPLAY_LEN).map(|b| format!("{b:02x}")).collect();
        let preview = if input.len() > MAX_INPUT_DISPLAY_LEN { format!("{preview}...") } else { preview };
        Self::Decoding { codec, message: message.to_string(), input: Some(preview) }
    }
}
