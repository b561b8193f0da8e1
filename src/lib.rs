//! # speechaug - speech corpus augmentation
//!
//! Expands every recording of a subject-keyed corpus into speed- and
//! pitch-perturbed variants, mirrored into a parallel output tree.
//!
//! ## Architecture
//!
//! speechaug is an umbrella crate that coordinates:
//! - **speechaug-core** - Waveform buffers, FFT helpers, band-limited resampling
//! - **speechaug-codec** - WAV decode/encode with atomic writes
//! - **speechaug-stretch** - Duration-preserving pitch shifting (phase vocoder)
//!
//! and adds the corpus walker, the augmentation planner and the pipeline
//! driver.
//!
//! ## Layout
//!
//! ```text
//! INPUT/<subject>/<stem>.wav
//! OUTPUT/<subject>/<stem>_orig.wav
//! OUTPUT/<subject>/<stem>_speed0.9.wav
//! OUTPUT/<subject>/<stem>_speed0.9_pitch-100.wav
//! ...
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use speechaug::prelude::*;
//!
//! let config = PipelineConfig::resolve(None, ConfigOverrides {
//!     input_dir: Some("segments".into()),
//!     output_dir: Some("segments_augmented".into()),
//!     ..Default::default()
//! })?;
//! let summary = Augmenter::new(config)?.run()?;
//! ```

pub mod config;
pub mod corpus;
pub mod effects;
pub mod error;
pub mod pipeline;
pub mod plan;
pub mod recording;
pub mod report;

/// Re-export of speechaug-core for direct access
pub use speechaug_core as core;

/// Re-export of speechaug-codec
pub use speechaug_codec as codec;

/// Re-export of speechaug-stretch
pub use speechaug_stretch as stretch;

pub use config::{
    AugmentationConfig, ConfigFile, ConfigOverrides, PipelineConfig, PitchShift, SpeedFactor,
    SpeedMode,
};
pub use corpus::{ensure_subject_dir, Corpus, SubjectDir, AUDIO_SUFFIX};
pub use effects::{DspEffects, Effects};
pub use error::{BranchError, Error, RecordingError, Result, VariantError};
pub use pipeline::Augmenter;
pub use plan::{plan, AugmentationPlan, SpeedBranch, VariantSpec};
pub use recording::{Recording, RecordingId};
pub use report::{OutputArtifact, RecordingReport, RunSummary};

pub use speechaug_codec::BitDepth;
pub use speechaug_core::{ResampleQuality, Waveform};
pub use speechaug_stretch::FftSize;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        plan, AugmentationConfig, Augmenter, ConfigOverrides, Corpus, Effects, Error,
        PipelineConfig, PitchShift, Result, RunSummary, SpeedFactor, SpeedMode, VariantSpec,
    };
    pub use crate::{FftSize, ResampleQuality, Waveform};
}
