//! Error types for config persistence

use std::path::PathBuf;
use thiserror::Error;

use crate::codec::CodecError;

/// Errors while reading or writing the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode config file {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("failed to write config file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode configuration")]
    Encode(#[source] CodecError),

    #[error("failed to create config directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
