//! Pitch-shift parameters and FFT size presets.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Pitch-shift parameters
///
/// ## Range Limits
///
/// - `cents`: -2400 to +2400 (±2 octaves)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchShiftParams {
    /// Pitch shift in cents (100 cents = 1 semitone)
    pub cents: f32,

    /// Analysis frame size
    pub fft_size: FftSize,
}

impl PitchShiftParams {
    /// Minimum pitch shift (-2 octaves)
    pub const MIN_CENTS: f32 = -2400.0;
    /// Maximum pitch shift (+2 octaves)
    pub const MAX_CENTS: f32 = 2400.0;

    /// Validated parameters for a shift of `cents`.
    pub fn new(cents: f32, fft_size: FftSize) -> Result<Self> {
        if !cents.is_finite() || !(Self::MIN_CENTS..=Self::MAX_CENTS).contains(&cents) {
            return Err(Error::OutOfRange {
                cents,
                limit: Self::MAX_CENTS,
            });
        }
        Ok(Self { cents, fft_size })
    }

    /// Whether the shift is large enough to change anything
    pub fn is_active(&self) -> bool {
        self.cents.abs() > 0.5
    }

    /// Frequency ratio: `2^(cents / 1200)`
    pub fn pitch_ratio(&self) -> f32 {
        2.0_f32.powf(self.cents / 1200.0)
    }

    /// Analysis hop (fixed at 75% overlap).
    pub fn analysis_hop(&self) -> usize {
        self.fft_size.hop_size()
    }

    /// Synthesis hop for stretching by the pitch ratio.
    ///
    /// Output of the vocoder is `synthesis_hop / analysis_hop` times longer
    /// than its input; resampling by the inverse brings the duration back.
    pub fn synthesis_hop(&self) -> usize {
        let hop = (self.analysis_hop() as f32 * self.pitch_ratio()).round() as usize;
        hop.max(1)
    }

    /// `(source, target)` rates for resampling the stretched signal.
    ///
    /// The hop pair only approximates the pitch ratio, so the resample uses
    /// its own rate pair: reading at `source` and writing at `target` moves
    /// every frequency by `source / target`.
    pub fn resample_rates(&self) -> (u32, u32) {
        let ratio = 2.0_f64.powf(self.cents as f64 / 1200.0);
        let source = (RESAMPLE_BASE_RATE as f64 * ratio).round() as u32;
        (source, RESAMPLE_BASE_RATE)
    }
}

/// Output rate of the restoring resample in [`PitchShiftParams::resample_rates`].
///
/// Large enough that rounding the source rate costs under 0.02 cents.
const RESAMPLE_BASE_RATE: u32 = 48_000;

/// FFT size presets for time/frequency resolution trade-off
///
/// Larger frames resolve low voices better but smear transients. For
/// 16 kHz speech, `Medium` (128 ms) is a good default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "usize")]
pub enum FftSize {
    /// 1024-point FFT
    Small = 1024,

    /// 2048-point FFT - Default
    #[default]
    Medium = 2048,

    /// 4096-point FFT
    Large = 4096,

    /// 8192-point FFT
    XLarge = 8192,
}

impl FftSize {
    /// Get the FFT size as usize
    pub fn size(&self) -> usize {
        *self as usize
    }

    /// Get the default hop size (FFT size / 4 = 75% overlap)
    pub fn hop_size(&self) -> usize {
        self.size() / 4
    }
}

impl TryFrom<usize> for FftSize {
    type Error = String;

    fn try_from(size: usize) -> std::result::Result<Self, Self::Error> {
        match size {
            1024 => Ok(FftSize::Small),
            2048 => Ok(FftSize::Medium),
            4096 => Ok(FftSize::Large),
            8192 => Ok(FftSize::XLarge),
            other => Err(format!(
                "unsupported FFT size {} (expected 1024, 2048, 4096 or 8192)",
                other
            )),
        }
    }
}

impl std::str::FromStr for FftSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let size: usize = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid FFT size '{}'", s))?;
        FftSize::try_from(size)
    }
}
