//! Planar waveform buffer.

use crate::error::{Error, Result};

/// Immutable multi-channel audio buffer.
///
/// Samples are stored planar (one `Vec` per channel) and normalized to
/// `-1.0..=1.0`. All channels have the same number of frames. Transforms
/// never mutate a `Waveform` in place; they build a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl Waveform {
    /// Create a waveform from planar channel data.
    ///
    /// Fails if there are no channels, the channels differ in length, or the
    /// sample rate is zero.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if channels.is_empty() {
            return Err(Error::InvalidWaveform("no channels".into()));
        }
        if sample_rate == 0 {
            return Err(Error::InvalidSampleRate("sample rate is 0 Hz".into()));
        }
        let frames = channels[0].len();
        if let Some((idx, ch)) = channels
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != frames)
        {
            return Err(Error::InvalidWaveform(format!(
                "channel {} has {} frames, channel 0 has {}",
                idx,
                ch.len(),
                frames
            )));
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Create a mono waveform.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(vec![samples], sample_rate)
    }

    /// Split interleaved samples into a planar waveform.
    pub fn from_interleaved(samples: &[f32], num_channels: usize, sample_rate: u32) -> Result<Self> {
        if num_channels == 0 {
            return Err(Error::InvalidWaveform("no channels".into()));
        }
        if samples.len() % num_channels != 0 {
            return Err(Error::InvalidWaveform(format!(
                "{} interleaved samples do not divide into {} channels",
                samples.len(),
                num_channels
            )));
        }
        let frames = samples.len() / num_channels;
        let mut channels = vec![Vec::with_capacity(frames); num_channels];
        for frame in samples.chunks_exact(num_channels) {
            for (ch, &s) in channels.iter_mut().zip(frame) {
                ch.push(s);
            }
        }
        Self::new(channels, sample_rate)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Duration in seconds at the waveform's own sample rate.
    pub fn duration_seconds(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Same samples, different sample rate.
    ///
    /// Playback at the new rate changes tempo and pitch together.
    pub fn with_sample_rate(&self, sample_rate: u32) -> Result<Self> {
        Self::new(self.channels.clone(), sample_rate)
    }

    /// Interleave channels frame by frame.
    pub fn to_interleaved(&self) -> Vec<f32> {
        let n = self.num_channels();
        let mut out = Vec::with_capacity(self.frames() * n);
        for i in 0..self.frames() {
            for ch in &self.channels {
                out.push(ch[i]);
            }
        }
        out
    }

    /// Whether every sample is finite.
    pub fn is_finite(&self) -> bool {
        self.channels.iter().flatten().all(|s| s.is_finite())
    }

    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }
}
