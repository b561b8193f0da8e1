//! # speechaug codec
//!
//! Container I/O for speechaug: decode a file into a
//! [`Waveform`](speechaug_core::Waveform) plus its sample encoding, and
//! encode one back.
//!
//! Writes are atomic with respect to the destination path: audio is encoded
//! into a temporary file in the same directory and renamed into place once
//! the encoder has finalized.
//!
//! ## Feature Flags
//!
//! - `wav` (default): WAV via hound (pure Rust)

pub mod error;
pub mod format;
mod options;

pub use error::{CodecError, Result};
pub use options::{AudioFormat, BitDepth};

#[cfg(feature = "wav")]
pub use format::wav::{read_wav_file, write_wav_file, DecodedAudio};

use speechaug_core::Waveform;
use std::path::Path;

/// Decode an audio file, detecting the container from its extension.
#[cfg(feature = "wav")]
pub fn read_file(path: &Path) -> Result<DecodedAudio> {
    match AudioFormat::from_path(path) {
        Some(AudioFormat::Wav) => format::wav::read_wav_file(path),
        None => Err(unsupported(path)),
    }
}

/// Encode audio to a file, detecting the container from its extension.
///
/// - `.wav` -> WAV
#[allow(unused_variables)]
pub fn write_file(path: &Path, wave: &Waveform, bit_depth: BitDepth) -> Result<()> {
    match AudioFormat::from_path(path) {
        Some(AudioFormat::Wav) => {
            #[cfg(feature = "wav")]
            return format::wav::write_wav_file(path, wave, bit_depth);
            #[cfg(not(feature = "wav"))]
            return Err(CodecError::UnsupportedFormat(
                "WAV support not enabled".into(),
            ));
        }
        None => Err(unsupported(path)),
    }
}

fn unsupported(path: &Path) -> CodecError {
    CodecError::UnsupportedFormat(format!(
        "Unknown or unsupported file extension: {}. Supported: .wav",
        path.display()
    ))
}
