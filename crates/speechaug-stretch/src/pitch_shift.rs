//! Duration-preserving pitch shifter.

use speechaug_core::{resample, ResampleQuality, Waveform};

use crate::error::{Error, Result};
use crate::phase_vocoder::PhaseVocoder;
use crate::types::{FftSize, PitchShiftParams};

/// PitchShifter stretches each channel by the pitch ratio with a phase
/// vocoder and then resamples it by exactly `2^(cents/1200)`, so the output
/// has the input's length and sample rate.
///
/// A shifter is immutable once built and can be shared across threads.
#[derive(Debug, Clone)]
pub struct PitchShifter {
    vocoder: PhaseVocoder,
    fft_size: FftSize,
    quality: ResampleQuality,
}

impl PitchShifter {
    pub fn new(fft_size: FftSize) -> Result<Self> {
        Ok(Self {
            vocoder: PhaseVocoder::new(fft_size)?,
            fft_size,
            quality: ResampleQuality::default(),
        })
    }

    /// Quality of the rate-restoring resample step.
    pub fn with_quality(mut self, quality: ResampleQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn fft_size(&self) -> FftSize {
        self.fft_size
    }

    /// Minimum number of frames a waveform needs to be shifted.
    pub fn min_frames(&self) -> usize {
        self.fft_size.size()
    }

    /// Shift the pitch of `wave` by `cents`, keeping rate and duration.
    ///
    /// Fails for shifts outside ±2400 cents, signals shorter than one FFT
    /// frame, and non-finite input or output.
    pub fn shift(&self, wave: &Waveform, cents: f32) -> Result<Waveform> {
        let params = PitchShiftParams::new(cents, self.fft_size)?;

        let frames = wave.frames();
        if frames < self.min_frames() {
            return Err(Error::SignalTooShort {
                frames,
                required: self.min_frames(),
            });
        }
        if !wave.is_finite() {
            return Err(Error::NonFinite("input"));
        }
        if !params.is_active() {
            return Ok(wave.clone());
        }

        let ha = params.analysis_hop();
        let hs = params.synthesis_hop();

        let stretched = wave
            .channels()
            .iter()
            .map(|ch| self.vocoder.stretch(ch, hs))
            .collect::<Result<Vec<_>>>()?;

        // The vocoder keeps frequencies and scales length by `hs / ha`. The
        // resample then scales frequencies by the exact pitch ratio and
        // brings the length back to within a few frames of the input.
        let (source_rate, target_rate) = params.resample_rates();
        let stretched = Waveform::new(stretched, source_rate)?;
        let restored = resample(&stretched, target_rate, self.quality)?;

        // The vocoder's leading pad, measured after both length changes.
        let lead_in = (self.vocoder.fft_size() as f64 * hs as f64 / ha as f64 * target_rate as f64
            / source_rate as f64)
            .round() as usize;
        let channels: Vec<Vec<f32>> = restored
            .into_channels()
            .into_iter()
            .map(|mut ch| {
                ch.drain(..lead_in.min(ch.len()));
                ch.resize(frames, 0.0);
                ch
            })
            .collect();

        let shifted = Waveform::new(channels, wave.sample_rate())?;
        if !shifted.is_finite() {
            return Err(Error::NonFinite("output"));
        }
        Ok(shifted)
    }
}
