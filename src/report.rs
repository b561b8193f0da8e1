//! Outcome of processing recordings.

use std::path::PathBuf;

use crate::error::{BranchError, RecordingError, VariantError};
use crate::plan::VariantSpec;
use crate::recording::RecordingId;

/// A file the pipeline wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputArtifact {
    pub id: RecordingId,
    pub variant: VariantSpec,
    pub path: PathBuf,
    pub sample_rate: u32,
}

/// What happened to one recording that could be loaded.
#[derive(Debug)]
pub struct RecordingReport {
    pub id: RecordingId,
    pub source: PathBuf,
    /// Written artifacts in the order they were written.
    pub artifacts: Vec<OutputArtifact>,
    pub branch_failures: Vec<BranchError>,
    pub variant_failures: Vec<VariantError>,
}

impl RecordingReport {
    pub fn new(id: RecordingId, source: PathBuf) -> Self {
        Self {
            id,
            source,
            artifacts: Vec::new(),
            branch_failures: Vec::new(),
            variant_failures: Vec::new(),
        }
    }

    /// Every planned variant was written.
    pub fn is_complete(&self) -> bool {
        self.branch_failures.is_empty() && self.variant_failures.is_empty()
    }

    pub fn artifact(&self, variant: &VariantSpec) -> Option<&OutputArtifact> {
        self.artifacts.iter().find(|a| a.variant == *variant)
    }
}

/// Corpus-level counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub subjects: usize,
    /// Subjects whose output directory could not be created.
    pub subjects_failed: usize,
    pub recordings: usize,
    pub recordings_failed: usize,
    pub artifacts_written: usize,
    pub branches_failed: usize,
    pub variants_failed: usize,
}

impl RunSummary {
    /// Fold one recording outcome into the counts.
    pub fn record(&mut self, outcome: &Result<RecordingReport, RecordingError>) {
        self.recordings += 1;
        match outcome {
            Ok(report) => {
                self.artifacts_written += report.artifacts.len();
                self.branches_failed += report.branch_failures.len();
                self.variants_failed += report.variant_failures.len();
            }
            Err(_) => self.recordings_failed += 1,
        }
    }

    /// Whether anything at all failed.
    pub fn has_failures(&self) -> bool {
        self.subjects_failed > 0
            || self.recordings_failed > 0
            || self.branches_failed > 0
            || self.variants_failed > 0
    }
}
