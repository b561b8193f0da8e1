//! Test helpers and fixtures for speechaug integration tests
//!
//! Builds throwaway corpora in temp directories, writes WAV fixtures with
//! hound directly (independent of the codec under test) and provides
//! effects that fail on demand.
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `INT16_EPSILON`: one 16-bit quantization step
//! - `PERCEPTUAL_EPSILON` (0.001): Perceptual equivalence (-60dB)

#![allow(dead_code)]

pub mod tolerances;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use speechaug::prelude::*;
use speechaug::DspEffects;

/// Default test sample rate (common for speech corpora)
pub const TEST_SAMPLE_RATE: u32 = 16000;

/// Frames per fixture recording (0.5 s at 16 kHz)
pub const TEST_FRAMES: usize = 8000;

/// Generate a test signal: sine wave at given frequency for specified samples.
pub fn generate_sine(frequency: f64, sample_rate: u32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            ((2.0 * std::f64::consts::PI * frequency * t).sin() * 0.5) as f32
        })
        .collect()
}

/// Calculate RMS of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Estimate the frequency of a mono tone from its zero crossings.
pub fn tone_frequency(samples: &[f32], sample_rate: u32) -> f64 {
    let crossings = samples
        .windows(2)
        .filter(|w| (w[0] < 0.0) != (w[1] < 0.0))
        .count();
    crossings as f64 / 2.0 / (samples.len() as f64 / sample_rate as f64)
}

/// Check if two signals are approximately equal within tolerance.
pub fn signals_approx_equal(a: &[f32], b: &[f32], tolerance: f32) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tolerance)
}

// =============================================================================
// WAV fixtures (hound)
// =============================================================================

/// Write interleaved integer PCM with `bits` per sample.
pub fn write_wav_fixture(path: &Path, interleaved: &[f32], channels: u16, sample_rate: u32, bits: u16) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: bits,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create fixture");
    let scale = (1i64 << (bits - 1)) as f32;
    let max = (1i64 << (bits - 1)) - 1;
    for &s in interleaved {
        let v = ((s * scale).round() as i64).clamp(-max - 1, max) as i32;
        writer.write_sample(v).expect("write fixture sample");
    }
    writer.finalize().expect("finalize fixture");
}

/// Read a WAV back as its spec plus samples normalized to [-1, 1).
pub fn read_wav_fixture(path: &Path) -> (hound::WavSpec, Vec<f32>) {
    let mut reader = hound::WavReader::open(path).expect("open wav");
    let spec = reader.spec();
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.expect("float sample"))
            .collect(),
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.expect("int sample") as f32 / scale)
                .collect()
        }
    };
    (spec, samples)
}

/// File names directly inside `dir`.
pub fn file_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect()
}

// =============================================================================
// Corpus fixture
// =============================================================================

/// A corpus in a temp directory: `<tmp>/in/<subject>/*.wav` and an output
/// root at `<tmp>/out` that does not exist yet.
pub struct TestCorpus {
    dir: tempfile::TempDir,
}

impl TestCorpus {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("in")).expect("create input root");
        Self { dir }
    }

    pub fn input(&self) -> PathBuf {
        self.dir.path().join("in")
    }

    pub fn output(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn subject_output(&self, subject: &str) -> PathBuf {
        self.output().join(subject)
    }

    pub fn add_subject(&self, subject: &str) -> PathBuf {
        let dir = self.input().join(subject);
        fs::create_dir_all(&dir).expect("create subject");
        dir
    }

    /// Add a 16-bit mono tone recording.
    pub fn add_recording(&self, subject: &str, stem: &str) -> PathBuf {
        let samples = generate_sine(330.0, TEST_SAMPLE_RATE, TEST_FRAMES);
        self.add_recording_with(subject, stem, &samples, 1, TEST_SAMPLE_RATE, 16)
    }

    pub fn add_recording_with(
        &self,
        subject: &str,
        stem: &str,
        interleaved: &[f32],
        channels: u16,
        sample_rate: u32,
        bits: u16,
    ) -> PathBuf {
        let path = self.add_subject(subject).join(format!("{}.wav", stem));
        write_wav_fixture(&path, interleaved, channels, sample_rate, bits);
        path
    }

    /// Add an arbitrary file relative to the input root.
    pub fn add_file(&self, relative: &str, contents: &[u8]) -> PathBuf {
        let path = self.input().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn config(&self, speeds: &[f64], pitches: &[i32]) -> PipelineConfig {
        PipelineConfig {
            input_dir: self.input(),
            output_dir: self.output(),
            augmentation: AugmentationConfig::from_values(speeds, pitches).expect("valid config"),
            fft_size: FftSize::Small,
            resample_quality: ResampleQuality::Fast,
            ..Default::default()
        }
    }
}

// =============================================================================
// Failure injection
// =============================================================================

/// Real DSP effects that fail for chosen inputs.
///
/// Resample failures are keyed by target rate. Pitch failures are keyed by
/// the sample rate of the waveform being shifted (the speed branch's target
/// rate) and the cents.
pub struct FaultyEffects {
    inner: DspEffects,
    fail_resample_to: Option<u32>,
    fail_pitch: Option<(u32, i32)>,
}

impl FaultyEffects {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            inner: DspEffects::from_config(config).expect("dsp effects"),
            fail_resample_to: None,
            fail_pitch: None,
        }
    }

    pub fn fail_resample_to(mut self, target_rate: u32) -> Self {
        self.fail_resample_to = Some(target_rate);
        self
    }

    pub fn fail_pitch(mut self, sample_rate: u32, cents: i32) -> Self {
        self.fail_pitch = Some((sample_rate, cents));
        self
    }
}

impl Effects for FaultyEffects {
    fn resample(&self, wave: &Waveform, target_rate: u32) -> speechaug::core::Result<Waveform> {
        if self.fail_resample_to == Some(target_rate) {
            return Err(speechaug::core::Error::Resample("injected failure".into()));
        }
        self.inner.resample(wave, target_rate)
    }

    fn shift_pitch(&self, wave: &Waveform, cents: i32) -> speechaug::stretch::Result<Waveform> {
        if self.fail_pitch == Some((wave.sample_rate(), cents)) {
            return Err(speechaug::stretch::Error::NonFinite("output"));
        }
        self.inner.shift_pitch(wave, cents)
    }
}

/// Names a 16 kHz recording `stem` expands to under speeds {0.9, 1.1} and
/// pitches {-100, +100}.
pub fn default_artifact_names(stem: &str) -> BTreeSet<String> {
    [
        "orig",
        "speed0.9",
        "speed0.9_pitch+100",
        "speed0.9_pitch-100",
        "speed1.1",
        "speed1.1_pitch+100",
        "speed1.1_pitch-100",
    ]
    .iter()
    .map(|tag| format!("{}_{}.wav", stem, tag))
    .collect()
}
