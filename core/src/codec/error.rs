//! Error types for config encoding and decoding

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("import string is empty")]
    Empty,

    #[error("failed to serialize settings")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to compress settings")]
    Compress(#[source] std::io::Error),

    #[error("import string is not valid base64")]
    Base64(#[source] base64::DecodeError),

    #[error("failed to decompress import string")]
    Decompress(#[source] std::io::Error),

    #[error("failed to parse settings")]
    Parse(#[source] serde_json::Error),

    #[error("settings root is not an object")]
    NotAnObject,

    #[error("settings carry no type tag")]
    MissingTypeTag,

    #[error("unable to load type '{name}'")]
    TypeLoad { name: String },

    #[error("expected {expected}, found '{found}'")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}
