//! Selecting a codec by name.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{BincodeCodec, CborCodec, Codec, JsonCodec};
use crate::CoreError;

/// The built-in codecs, selectable by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CodecKind {
    /// [`CborCodec`], the default.
    #[default]
    Cbor,
    /// [`BincodeCodec`].
    Bincode,
    /// [`JsonCodec`].
    Json,
}

impl CodecKind {
    /// The name this kind is selected by.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cbor => CborCodec::NAME,
            Self::Bincode => BincodeCodec::NAME,
            Self::Json => JsonCodec::NAME,
        }
    }

    /// Build a boxed codec of this kind for values of type `V`.
    #[must_use]
    pub fn build<V>(self) -> Box<dyn Codec<V>>
    where
        V: Serialize + DeserializeOwned + 'static,
    {
        match self {
            Self::Cbor => Box::new(CborCodec),
            Self::Bincode => Box::new(BincodeCodec),
            Self::Json => Box::new(JsonCodec),
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CodecKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cbor" => Ok(Self::Cbor),
            "bincode" => Ok(Self::Bincode),
            "json" => Ok(Self::Json),
            _ => Err(CoreError::UnknownCodec(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("cbor".parse::<CodecKind>().unwrap(), CodecKind::Cbor);
        assert_eq!("Bincode".parse::<CodecKind>().unwrap(), CodecKind::Bincode);
        assert_eq!(" JSON ".parse::<CodecKind>().unwrap(), CodecKind::Json);
        assert!(matches!("msgpack".parse::<CodecKind>(), Err(CoreError::UnknownCodec(_))));
    }

    #[test]
    fn display_matches_built_codec_name() {
        for kind in [CodecKind::Cbor, CodecKind::Bincode, CodecKind::Json] {
            let codec = kind.build::<String>();
            assert_eq!(codec.name(), kind.to_string());
        }
    }

    #[test]
    fn default_is_cbor() {
        assert_eq!(CodecKind::default(), CodecKind::Cbor);
    }
}
