//! Audio resampling using rubato
//!
//! Band-limited sample rate conversion for planar waveforms of any channel
//! count. The resampler's own delay is compensated so the output is aligned
//! with the input and has exactly `round(frames * target / source)` frames.

use rubato::{FftFixedIn, Resampler};

use crate::error::{Error, Result};
use crate::waveform::Waveform;

/// Resampling quality presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResampleQuality {
    /// Fast resampling (lower quality)
    Fast,
    /// Balanced quality/speed (default)
    #[default]
    Medium,
    /// High quality
    High,
    /// Best quality (slowest)
    Best,
}

impl ResampleQuality {
    fn chunk_size(&self) -> usize {
        match self {
            ResampleQuality::Fast => 512,
            ResampleQuality::Medium => 1024,
            ResampleQuality::High => 2048,
            ResampleQuality::Best => 4096,
        }
    }

    fn sub_chunks(&self) -> usize {
        match self {
            ResampleQuality::Fast => 1,
            ResampleQuality::Medium => 2,
            ResampleQuality::High => 4,
            ResampleQuality::Best => 8,
        }
    }
}

/// Target rate for a speed factor: `round(source_rate * factor)`.
///
/// Rounds to nearest. A factor that is not finite and positive, or a result
/// that falls outside `1..=u32::MAX`, is an error.
pub fn target_rate(source_rate: u32, factor: f64) -> Result<u32> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(Error::InvalidSampleRate(format!(
            "speed factor {} must be finite and positive",
            factor
        )));
    }
    let rate = (source_rate as f64 * factor).round();
    if rate < 1.0 || rate > u32::MAX as f64 {
        return Err(Error::InvalidSampleRate(format!(
            "{} Hz x {} gives unusable rate {}",
            source_rate, factor, rate
        )));
    }
    Ok(rate as u32)
}

/// Convert `wave` to `target_rate`.
///
/// Identical rates return a copy. An empty waveform stays empty.
pub fn resample(wave: &Waveform, target_rate: u32, quality: ResampleQuality) -> Result<Waveform> {
    if target_rate == 0 {
        return Err(Error::InvalidSampleRate("target rate is 0 Hz".into()));
    }

    let source_rate = wave.sample_rate();
    if source_rate == target_rate {
        return Ok(wave.clone());
    }

    let num_channels = wave.num_channels();
    let input_frames = wave.frames();
    if input_frames == 0 {
        return Waveform::new(vec![Vec::new(); num_channels], target_rate);
    }

    let expected_output_frames =
        (input_frames as f64 * target_rate as f64 / source_rate as f64).round() as usize;

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        target_rate as usize,
        quality.chunk_size(),
        quality.sub_chunks(),
        num_channels,
    )?;

    let delay = resampler.output_delay();
    let needed = delay + expected_output_frames;
    let mut output: Vec<Vec<f32>> = vec![Vec::with_capacity(needed); num_channels];

    let mut pos = 0;
    while pos < input_frames {
        let wanted = resampler.input_frames_next();
        let end = (pos + wanted).min(input_frames);
        let chunk: Vec<&[f32]> = wave.channels().iter().map(|ch| &ch[pos..end]).collect();

        // The last chunk is zero-padded by rubato.
        let processed = if end - pos == wanted {
            resampler.process(&chunk, None)?
        } else {
            resampler.process_partial(Some(chunk.as_slice()), None)?
        };
        append_planar(&mut output, processed);
        pos = end;
    }

    // Flush the delay line.
    while output[0].len() < needed {
        let processed = resampler.process_partial(None::<&[&[f32]]>, None)?;
        if processed[0].is_empty() {
            break;
        }
        append_planar(&mut output, processed);
    }

    for ch in output.iter_mut() {
        let skip = delay.min(ch.len());
        ch.drain(..skip);
        ch.resize(expected_output_frames, 0.0);
    }

    Waveform::new(output, target_rate)
}

fn append_planar(output: &mut [Vec<f32>], processed: Vec<Vec<f32>>) {
    for (dst, src) in output.iter_mut().zip(processed) {
        dst.extend_from_slice(&src);
    }
}
