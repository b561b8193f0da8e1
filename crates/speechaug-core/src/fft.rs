//! Real-signal FFT helpers.

use std::sync::Arc;

use rustfft::{Fft, FftPlanner};

pub use rustfft::num_complex::Complex32;

use crate::error::{Error, Result};

/// Planned forward and inverse FFT for real signals of one transform size.
///
/// Only the non-negative half of the spectrum (`size / 2 + 1` bins) is
/// exposed; the other half is its mirror for real input. Planning is the
/// expensive part, so reuse one `RealFft` for every frame of the same size.
#[derive(Clone)]
pub struct RealFft {
    size: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

impl RealFft {
    pub fn new(size: usize) -> Result<Self> {
        if size < 2 || size % 2 != 0 {
            return Err(Error::Fft(format!("FFT size must be even and >= 2, got {}", size)));
        }
        let mut planner = FftPlanner::<f32>::new();
        Ok(Self {
            size,
            forward: planner.plan_fft_forward(size),
            inverse: planner.plan_fft_inverse(size),
        })
    }

    /// Transform size in samples.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of complex bins (`size / 2 + 1`).
    pub fn num_bins(&self) -> usize {
        self.size / 2 + 1
    }

    /// Forward transform of `size` real samples into `num_bins` bins.
    pub fn forward(&self, input: &[f32], spectrum: &mut [Complex32]) -> Result<()> {
        self.check_lengths(input.len(), spectrum.len())?;

        let mut buffer: Vec<Complex32> = input.iter().map(|&x| Complex32::new(x, 0.0)).collect();
        self.forward.process(&mut buffer);
        spectrum.copy_from_slice(&buffer[..spectrum.len()]);
        Ok(())
    }

    /// Inverse transform, scaled by `1 / size` so that
    /// `inverse(forward(x)) == x`.
    ///
    /// The imaginary parts of the DC and Nyquist bins are ignored; they
    /// carry no information for a real signal.
    pub fn inverse(&self, spectrum: &[Complex32], output: &mut [f32]) -> Result<()> {
        self.check_lengths(output.len(), spectrum.len())?;

        let n = self.size;
        let last = spectrum.len() - 1;
        let mut buffer = vec![Complex32::new(0.0, 0.0); n];
        buffer[..=last].copy_from_slice(spectrum);
        buffer[0].im = 0.0;
        buffer[last].im = 0.0;
        for k in 1..last {
            buffer[n - k] = spectrum[k].conj();
        }

        self.inverse.process(&mut buffer);
        let scale = 1.0 / n as f32;
        for (out, c) in output.iter_mut().zip(&buffer) {
            *out = c.re * scale;
        }
        Ok(())
    }

    fn check_lengths(&self, samples: usize, bins: usize) -> Result<()> {
        if samples != self.size || bins != self.num_bins() {
            return Err(Error::Fft(format!(
                "expected {} samples and {} bins, got {} and {}",
                self.size,
                self.num_bins(),
                samples,
                bins
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for RealFft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealFft").field("size", &self.size).finish()
    }
}
