//! Container encoding options.

use std::path::Path;

/// Audio container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioFormat {
    #[default]
    Wav,
}

impl AudioFormat {
    /// File extension (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
        }
    }

    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("wav") {
            Some(AudioFormat::Wav)
        } else {
            None
        }
    }
}

/// PCM sample encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    Int8,
    #[default]
    Int16,
    Int24,
    Int32,
    Float32,
}

impl BitDepth {
    /// Bits per sample.
    pub fn bits(&self) -> u16 {
        match self {
            BitDepth::Int8 => 8,
            BitDepth::Int16 => 16,
            BitDepth::Int24 => 24,
            BitDepth::Int32 => 32,
            BitDepth::Float32 => 32,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, BitDepth::Float32)
    }

    /// Full-scale magnitude for integer encodings (`2^(bits-1)`).
    pub(crate) fn full_scale(&self) -> f64 {
        (1u64 << (self.bits() - 1)) as f64
    }
}
