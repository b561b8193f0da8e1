//! Error types for speechaug-core.

use thiserror::Error;

/// Error type for waveform construction and resampling.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid waveform: {0}")]
    InvalidWaveform(String),

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(String),

    #[error("Resampling error: {0}")]
    Resample(String),

    #[error("FFT error: {0}")]
    Fft(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

// External resampler errors are reduced to strings at the crate boundary.

impl From<rubato::ResamplerConstructionError> for Error {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        Error::Resample(e.to_string())
    }
}

impl From<rubato::ResampleError> for Error {
    fn from(e: rubato::ResampleError) -> Self {
        Error::Resample(e.to_string())
    }
}
