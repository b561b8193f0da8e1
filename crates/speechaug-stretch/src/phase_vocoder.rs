//! Phase vocoder for offline time-stretching
//!
//! Implements a phase vocoder over a whole buffer using STFT
//! analysis/synthesis.
//!
//! ## Algorithm Overview
//!
//! 1. **Analysis**: Window the input with a Hann window every `hop_analysis`
//!    samples, perform FFT
//! 2. **Phase Unwrapping**: Calculate instantaneous frequency from the phase
//!    difference between consecutive frames
//! 3. **Synthesis**: Advance each bin's phase by its instantaneous frequency
//!    scaled to the synthesis hop, IFFT, windowed overlap-add
//! 4. **Normalization**: Divide by the accumulated squared window so any
//!    synthesis hop gives unity gain

use std::f32::consts::PI;

use speechaug_core::{Complex32, RealFft};

use crate::error::{Error, Result};
use crate::types::FftSize;

/// Squared-window sums below this are treated as this value when
/// normalizing, so sparse overlap at large hops does not blow up.
const WINDOW_SUM_FLOOR: f32 = 1e-3;

/// Phase vocoder time-stretcher.
///
/// Stretches a mono signal by `synthesis_hop / hop_analysis`. Pitch is
/// unchanged by the stretch itself.
#[derive(Debug, Clone)]
pub struct PhaseVocoder {
    fft: RealFft,
    fft_size: usize,
    hop_analysis: usize,
    window: Vec<f32>,
    expected_phase_diff: Vec<f32>,
}

impl PhaseVocoder {
    pub fn new(fft_size: FftSize) -> Result<Self> {
        let size = fft_size.size();
        let hop = fft_size.hop_size();
        let num_bins = size / 2 + 1;

        // Pre-calculate expected phase difference per bin per hop
        let expected_phase_diff: Vec<f32> = (0..num_bins)
            .map(|k| 2.0 * PI * (k as f32) * (hop as f32) / (size as f32))
            .collect();

        Ok(Self {
            fft: RealFft::new(size)?,
            fft_size: size,
            hop_analysis: hop,
            window: Self::create_hann_window(size),
            expected_phase_diff,
        })
    }

    /// Create a periodic Hann window of the specified size
    fn create_hann_window(size: usize) -> Vec<f32> {
        (0..size)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / size as f32).cos()))
            .collect()
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn hop_analysis(&self) -> usize {
        self.hop_analysis
    }

    /// Time-stretch `input` with the given synthesis hop.
    ///
    /// The input is padded with `fft_size` zeros on both sides before
    /// analysis, so the returned buffer starts with
    /// `fft_size * synthesis_hop / hop_analysis` samples of lead-in and is
    /// longer than `input.len() * synthesis_hop / hop_analysis`. Callers trim.
    pub fn stretch(&self, input: &[f32], synthesis_hop: usize) -> Result<Vec<f32>> {
        let n = self.fft_size;
        let ha = self.hop_analysis;
        let hs = synthesis_hop.max(1);

        if input.len() < n {
            return Err(Error::SignalTooShort {
                frames: input.len(),
                required: n,
            });
        }

        let mut padded = vec![0.0f32; n];
        padded.extend_from_slice(input);
        padded.resize(padded.len() + n, 0.0);

        let num_frames = (padded.len() - n) / ha + 1;
        let out_len = (num_frames - 1) * hs + n;
        let num_bins = self.fft.num_bins();
        let hop_ratio = hs as f32 / ha as f32;

        let mut output = vec![0.0f32; out_len];
        let mut window_sum = vec![0.0f32; out_len];

        let mut frame = vec![0.0f32; n];
        let mut time_frame = vec![0.0f32; n];
        let mut spectrum = vec![Complex32::new(0.0, 0.0); num_bins];
        let mut last_phase = vec![0.0f32; num_bins];
        let mut synth_phase = vec![0.0f32; num_bins];

        for f in 0..num_frames {
            // 1. Copy input to FFT buffer with analysis window
            let start = f * ha;
            for (i, s) in frame.iter_mut().enumerate() {
                *s = padded[start + i] * self.window[i];
            }

            // 2. Forward FFT
            self.fft.forward(&frame, &mut spectrum)?;

            // 3. Phase unwrapping and accumulation
            for k in 0..num_bins {
                let magnitude = spectrum[k].norm();
                let phase = spectrum[k].arg();

                if f == 0 {
                    synth_phase[k] = phase;
                } else {
                    let expected = self.expected_phase_diff[k];
                    let deviation = Self::wrap_phase(phase - last_phase[k] - expected);
                    let true_freq = expected + deviation;
                    synth_phase[k] = Self::wrap_phase(synth_phase[k] + true_freq * hop_ratio);
                }
                last_phase[k] = phase;

                spectrum[k] = Complex32::from_polar(magnitude, synth_phase[k]);
            }

            // 4. Inverse FFT
            self.fft.inverse(&spectrum, &mut time_frame)?;

            // 5. Synthesis window and overlap-add
            let out_start = f * hs;
            for i in 0..n {
                let w = self.window[i];
                output[out_start + i] += time_frame[i] * w;
                window_sum[out_start + i] += w * w;
            }
        }

        for (s, w) in output.iter_mut().zip(&window_sum) {
            *s /= w.max(WINDOW_SUM_FLOOR);
        }

        Ok(output)
    }

    /// Wrap phase to [-PI, PI]
    #[inline]
    fn wrap_phase(phase: f32) -> f32 {
        let mut p = phase;
        while p > PI {
            p -= 2.0 * PI;
        }
        while p < -PI {
            p += 2.0 * PI;
        }
        p
    }
}
