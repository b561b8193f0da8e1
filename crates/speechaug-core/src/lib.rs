//! Core audio types for speechaug.
//!
//! - [`Waveform`]: immutable planar sample buffer with its sample rate
//! - [`resample`]: band-limited sample-rate conversion (rubato)
//! - [`RealFft`]: planned forward/inverse FFT for real signals (rustfft)

pub mod error;
pub use error::{Error, Result};

mod fft;
pub use fft::{Complex32, RealFft};

mod resample;
pub use resample::{resample, target_rate, ResampleQuality};

mod waveform;
pub use waveform::Waveform;
