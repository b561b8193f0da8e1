//! Error types for speechaug-codec

use std::io;
use thiserror::Error;

/// Codec error type
#[derive(Error, Debug)]
pub enum CodecError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported container or feature not enabled
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Container could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Decoded data does not form a valid waveform
    #[error("Invalid audio data: {0}")]
    InvalidData(#[from] speechaug_core::Error),
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(feature = "wav")]
impl From<hound::Error> for CodecError {
    fn from(e: hound::Error) -> Self {
        match e {
            hound::Error::IoError(io) => CodecError::Io(io),
            other => CodecError::Decode(other.to_string()),
        }
    }
}

impl From<tempfile::PersistError> for CodecError {
    fn from(e: tempfile::PersistError) -> Self {
        CodecError::Io(e.error)
    }
}
