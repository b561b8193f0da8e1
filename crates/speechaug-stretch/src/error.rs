//! Error types.

use thiserror::Error;

/// Error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Signal is shorter than one analysis frame.
    #[error("Signal too short: {frames} frames, need at least {required}")]
    SignalTooShort { frames: usize, required: usize },

    /// Pitch shift outside the supported range.
    #[error("Pitch shift of {cents} cents is outside ±{limit} cents")]
    OutOfRange { cents: f32, limit: f32 },

    /// Input or output contains NaN or infinite samples.
    #[error("Non-finite samples in {0}")]
    NonFinite(&'static str),

    /// Rate-restoring resample or FFT failed.
    #[error("DSP error: {0}")]
    Dsp(#[from] speechaug_core::Error),
}

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;
