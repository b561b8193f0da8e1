//! Run configuration.
//!
//! A [`PipelineConfig`] is resolved once at startup from built-in defaults,
//! an optional TOML file and command-line overrides (in that order of
//! increasing precedence). It is validated on construction and never
//! mutated afterwards; the planner and driver borrow it.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use speechaug_core::ResampleQuality;
use speechaug_stretch::FftSize;

use crate::error::{Error, Result};

/// Default input root.
pub const DEFAULT_INPUT_DIR: &str = "segments";
/// Default output root.
pub const DEFAULT_OUTPUT_DIR: &str = "segments_augmented";
/// Default speed factors.
pub const DEFAULT_SPEEDS: [f64; 2] = [0.9, 1.1];
/// Default pitch shifts in cents.
pub const DEFAULT_PITCHES: [i32; 2] = [-100, 100];

/// Playback-rate ratio applied by a speed branch.
///
/// Always finite and positive. Renders as the shortest decimal that
/// round-trips, keeping a trailing `.0` on integral values (`0.9`, `1.1`,
/// `1.0`), which is the form used in artifact names.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "f64")]
pub struct SpeedFactor(f64);

impl SpeedFactor {
    pub fn new(ratio: f64) -> Result<Self> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "speed factor must be a positive finite number, got {}",
                ratio
            )));
        }
        Ok(Self(ratio))
    }

    pub fn ratio(&self) -> f64 {
        self.0
    }

    /// Label used in file names, e.g. `0.9` or `1.0`.
    pub fn label(&self) -> String {
        let s = self.0.to_string();
        if s.contains('.') {
            s
        } else {
            format!("{}.0", s)
        }
    }
}

impl fmt::Display for SpeedFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl TryFrom<f64> for SpeedFactor {
    type Error = Error;

    fn try_from(ratio: f64) -> Result<Self> {
        Self::new(ratio)
    }
}

impl FromStr for SpeedFactor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let ratio: f64 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidConfig(format!("invalid speed factor '{}'", s)))?;
        Self::new(ratio)
    }
}

/// Signed pitch shift in cents.
///
/// Displays with an explicit sign: `+100`, `-100`, `+0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct PitchShift(i32);

impl PitchShift {
    pub fn new(cents: i32) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for PitchShift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

impl From<i32> for PitchShift {
    fn from(cents: i32) -> Self {
        Self(cents)
    }
}

/// Ordered speed factors and pitch shifts to expand each recording into.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentationConfig {
    speeds: Vec<SpeedFactor>,
    pitches: Vec<PitchShift>,
}

impl AugmentationConfig {
    /// Validate and build.
    ///
    /// Rejects speed factors that would render to the same label and
    /// repeated pitch shifts. Either list may be empty. Shifts beyond what
    /// the pitch shifter supports fail per variant at run time.
    pub fn new(speeds: Vec<SpeedFactor>, pitches: Vec<PitchShift>) -> Result<Self> {
        let mut labels = HashSet::new();
        for speed in &speeds {
            if !labels.insert(speed.label()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate speed factor {}",
                    speed
                )));
            }
        }

        let mut seen = HashSet::new();
        for pitch in &pitches {
            if !seen.insert(*pitch) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate pitch shift {}",
                    pitch
                )));
            }
        }

        Ok(Self { speeds, pitches })
    }

    /// Build from raw ratios and cents.
    pub fn from_values(speeds: &[f64], pitches: &[i32]) -> Result<Self> {
        let speeds = speeds
            .iter()
            .map(|&s| SpeedFactor::new(s))
            .collect::<Result<Vec<_>>>()?;
        let pitches = pitches.iter().copied().map(PitchShift::new).collect();
        Self::new(speeds, pitches)
    }

    pub fn speeds(&self) -> &[SpeedFactor] {
        &self.speeds
    }

    pub fn pitches(&self) -> &[PitchShift] {
        &self.pitches
    }

    /// Number of artifacts per recording: `1 + S + S·P`.
    pub fn variants_per_recording(&self) -> usize {
        1 + self.speeds.len() * (1 + self.pitches.len())
    }
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            speeds: DEFAULT_SPEEDS.iter().map(|&s| SpeedFactor(s)).collect(),
            pitches: DEFAULT_PITCHES.iter().copied().map(PitchShift).collect(),
        }
    }
}

/// How a speed branch changes the waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedMode {
    /// Keep the samples and relabel them with `round(rate × factor)`, so
    /// tempo and pitch move together on playback.
    #[default]
    Reinterpret,
    /// Band-limited conversion to `round(rate × factor)`. Duration and
    /// pitch are unchanged; only the stored rate differs.
    Resample,
}

impl FromStr for SpeedMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resample" => Ok(SpeedMode::Resample),
            "reinterpret" => Ok(SpeedMode::Reinterpret),
            other => Err(Error::InvalidConfig(format!(
                "unknown speed mode '{}' (expected resample or reinterpret)",
                other
            ))),
        }
    }
}

/// Parse a resample quality name: `fast`, `medium`, `high` or `best`.
pub fn parse_resample_quality(s: &str) -> Result<ResampleQuality> {
    match s.trim().to_ascii_lowercase().as_str() {
        "fast" => Ok(ResampleQuality::Fast),
        "medium" => Ok(ResampleQuality::Medium),
        "high" => Ok(ResampleQuality::High),
        "best" => Ok(ResampleQuality::Best),
        other => Err(Error::InvalidConfig(format!(
            "unknown resample quality '{}' (expected fast, medium, high or best)",
            other
        ))),
    }
}

/// Contents of a TOML configuration file. Every key is optional.
///
/// ```toml
/// input_dir = "segments"
/// output_dir = "segments_augmented"
/// speed_factors = [0.9, 1.1]
/// pitch_shifts = [-100, 100]
/// jobs = 4
/// speed_mode = "reinterpret"
/// fft_size = 2048
/// resample_quality = "high"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub speed_factors: Option<Vec<f64>>,
    pub pitch_shifts: Option<Vec<i32>>,
    pub jobs: Option<usize>,
    pub speed_mode: Option<SpeedMode>,
    pub fft_size: Option<FftSize>,
    pub resample_quality: Option<String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&text).map_err(|e| match e {
            Error::InvalidConfig(message) => Error::ConfigFile {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

/// Values given on the command line (or through their environment
/// variables). `None` leaves the lower layer in place.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub speeds: Option<Vec<f64>>,
    pub pitches: Option<Vec<i32>>,
    pub jobs: Option<usize>,
    pub speed_mode: Option<SpeedMode>,
    pub fft_size: Option<FftSize>,
    pub resample_quality: Option<ResampleQuality>,
    pub dry_run: bool,
}

/// Fully resolved, validated configuration for one run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub augmentation: AugmentationConfig,
    /// Worker threads for recordings. `1` is sequential, `0` means one per core.
    pub jobs: usize,
    pub speed_mode: SpeedMode,
    pub fft_size: FftSize,
    pub resample_quality: ResampleQuality,
    /// List planned artifacts without reading or writing audio.
    pub dry_run: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            augmentation: AugmentationConfig::default(),
            jobs: 1,
            speed_mode: SpeedMode::default(),
            fft_size: FftSize::default(),
            resample_quality: ResampleQuality::default(),
            dry_run: false,
        }
    }
}

impl PipelineConfig {
    /// Layer `file` and then `overrides` over the defaults and validate.
    pub fn resolve(file: Option<ConfigFile>, overrides: ConfigOverrides) -> Result<Self> {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let speeds = overrides
            .speeds
            .or(file.speed_factors)
            .unwrap_or_else(|| DEFAULT_SPEEDS.to_vec());
        let pitches = overrides
            .pitches
            .or(file.pitch_shifts)
            .unwrap_or_else(|| DEFAULT_PITCHES.to_vec());

        let resample_quality = match (overrides.resample_quality, file.resample_quality) {
            (Some(q), _) => q,
            (None, Some(name)) => parse_resample_quality(&name)?,
            (None, None) => defaults.resample_quality,
        };

        let config = Self {
            input_dir: overrides
                .input_dir
                .or(file.input_dir)
                .unwrap_or(defaults.input_dir),
            output_dir: overrides
                .output_dir
                .or(file.output_dir)
                .unwrap_or(defaults.output_dir),
            augmentation: AugmentationConfig::from_values(&speeds, &pitches)?,
            jobs: overrides.jobs.or(file.jobs).unwrap_or(defaults.jobs),
            speed_mode: overrides
                .speed_mode
                .or(file.speed_mode)
                .unwrap_or(defaults.speed_mode),
            fft_size: overrides
                .fft_size
                .or(file.fft_size)
                .unwrap_or(defaults.fft_size),
            resample_quality,
            dry_run: overrides.dry_run,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that span several fields.
    pub fn validate(&self) -> Result<()> {
        if self.input_dir == self.output_dir {
            return Err(Error::InvalidConfig(format!(
                "input and output directories are the same: {}",
                self.input_dir.display()
            )));
        }
        Ok(())
    }
}
