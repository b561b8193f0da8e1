//! Error types, one per isolation scope.
//!
//! - [`Error`]: catastrophic. Stops the run and gives a non-zero exit.
//! - [`RecordingError`]: aborts one recording. Other recordings continue.
//! - [`BranchError`]: aborts one speed branch and the pitch variants under it.
//! - [`VariantError`]: one pitch variant is missing. Logged and skipped.

use std::path::PathBuf;

use speechaug_codec::CodecError;
use thiserror::Error;

use crate::config::{PitchShift, SpeedFactor};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config file {}: {message}", .path.display())]
    ConfigFile { path: PathBuf, message: String },

    #[error("Input directory not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Input path is not a directory: {}", .0.display())]
    InputNotADirectory(PathBuf),

    #[error("Cannot create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Thread pool: {0}")]
    ThreadPool(String),

    #[error("Pitch shifter: {0}")]
    Stretch(#[from] speechaug_stretch::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A recording could not be loaded or its original could not be written.
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("failed to write original {}: {source}", .path.display())]
    WriteOriginal {
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

/// A speed branch failed before its speed-only artifact was written.
#[derive(Error, Debug)]
pub enum BranchError {
    #[error("speed {speed}: resample failed: {source}")]
    Resample {
        speed: SpeedFactor,
        #[source]
        source: speechaug_core::Error,
    },

    #[error("speed {speed}: failed to write {}: {source}", .path.display())]
    Write {
        speed: SpeedFactor,
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

impl BranchError {
    pub fn speed(&self) -> SpeedFactor {
        match self {
            BranchError::Resample { speed, .. } | BranchError::Write { speed, .. } => *speed,
        }
    }
}

/// One speed+pitch variant failed. Its siblings are unaffected.
#[derive(Error, Debug)]
pub enum VariantError {
    #[error("speed {speed}, pitch {cents}: shift failed: {source}")]
    PitchShift {
        speed: SpeedFactor,
        cents: PitchShift,
        #[source]
        source: speechaug_stretch::Error,
    },

    #[error("speed {speed}, pitch {cents}: failed to write {}: {source}", .path.display())]
    Write {
        speed: SpeedFactor,
        cents: PitchShift,
        path: PathBuf,
        #[source]
        source: CodecError,
    },
}

impl VariantError {
    pub fn speed(&self) -> SpeedFactor {
        match self {
            VariantError::PitchShift { speed, .. } | VariantError::Write { speed, .. } => *speed,
        }
    }

    pub fn cents(&self) -> PitchShift {
        match self {
            VariantError::PitchShift { cents, .. } | VariantError::Write { cents, .. } => *cents,
        }
    }
}
