//! DSP backends used by the pipeline driver.

use speechaug_core::{ResampleQuality, Waveform};
use speechaug_stretch::{FftSize, PitchShifter};

use crate::config::{PipelineConfig, SpeedMode};
use crate::error::Result;

/// Waveform transforms the driver applies.
///
/// The two methods fail with different error types: a resample failure
/// ends a speed branch, a pitch-shift failure only drops one variant.
pub trait Effects: Send + Sync {
    /// Bring `wave` to `target_rate`.
    fn resample(&self, wave: &Waveform, target_rate: u32) -> speechaug_core::Result<Waveform>;

    /// Shift pitch by `cents`, keeping rate and duration.
    fn shift_pitch(&self, wave: &Waveform, cents: i32) -> speechaug_stretch::Result<Waveform>;
}

/// Production effects: relabel or rubato for speed, phase vocoder for pitch.
#[derive(Debug, Clone)]
pub struct DspEffects {
    speed_mode: SpeedMode,
    quality: ResampleQuality,
    shifter: PitchShifter,
}

impl DspEffects {
    pub fn new(speed_mode: SpeedMode, quality: ResampleQuality, fft_size: FftSize) -> Result<Self> {
        Ok(Self {
            speed_mode,
            quality,
            shifter: PitchShifter::new(fft_size)?.with_quality(quality),
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::new(config.speed_mode, config.resample_quality, config.fft_size)
    }
}

impl Effects for DspEffects {
    fn resample(&self, wave: &Waveform, target_rate: u32) -> speechaug_core::Result<Waveform> {
        match self.speed_mode {
            SpeedMode::Resample => speechaug_core::resample(wave, target_rate, self.quality),
            SpeedMode::Reinterpret => wave.with_sample_rate(target_rate),
        }
    }

    fn shift_pitch(&self, wave: &Waveform, cents: i32) -> speechaug_stretch::Result<Waveform> {
        self.shifter.shift(wave, cents as f32)
    }
}
