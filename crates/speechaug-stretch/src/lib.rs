//! Offline time-stretching and pitch-shifting.
//!
//! Pitch is shifted by time-stretching with a phase vocoder and then
//! resampling the stretched signal back to the original length. Sample rate
//! and duration are preserved; only the perceived pitch moves.
//!
//! # Example
//!
//! ```ignore
//! use speechaug_stretch::{PitchShifter, FftSize};
//!
//! let shifter = PitchShifter::new(FftSize::Medium)?;
//!
//! // Up one semitone
//! let shifted = shifter.shift(&wave, 100.0)?;
//! assert_eq!(shifted.frames(), wave.frames());
//! ```

mod error;
mod phase_vocoder;
mod pitch_shift;
mod types;

pub use error::{Error, Result};
pub use phase_vocoder::PhaseVocoder;
pub use pitch_shift::PitchShifter;
pub use types::{FftSize, PitchShiftParams};
