//! Pipeline driver.
//!
//! Each recording goes `Loaded -> OriginalWritten -> (speed variant ->
//! its pitch variants)* -> Done`. Failures stop at the narrowest scope
//! that owns them:
//!
//! | Failure                          | Scope            |
//! |----------------------------------|------------------|
//! | read, original write             | the recording    |
//! | resample, speed-only write       | the speed branch |
//! | pitch shift, pitch-variant write | that variant     |
//!
//! Nothing is retried and only the corpus root and output root can fail a
//! whole run.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use speechaug_core::target_rate;

use crate::config::{PitchShift, PipelineConfig};
use crate::corpus::{ensure_subject_dir, Corpus};
use crate::effects::{DspEffects, Effects};
use crate::error::{BranchError, Error, RecordingError, Result, VariantError};
use crate::plan::{plan, AugmentationPlan, SpeedBranch, VariantSpec};
use crate::recording::{stem_of, Recording, RecordingId};
use crate::report::{OutputArtifact, RecordingReport, RunSummary};

/// Expands a corpus into its augmented mirror.
///
/// ```ignore
/// use speechaug::{Augmenter, PipelineConfig};
///
/// let config = PipelineConfig {
///     input_dir: "segments".into(),
///     output_dir: "segments_augmented".into(),
///     ..Default::default()
/// };
/// let summary = Augmenter::new(config)?.run()?;
/// println!("{} artifacts", summary.artifacts_written);
/// ```
pub struct Augmenter<E = DspEffects> {
    config: PipelineConfig,
    plan: AugmentationPlan,
    effects: E,
}

impl Augmenter<DspEffects> {
    /// Driver with the production DSP backends.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let effects = DspEffects::from_config(&config)?;
        Self::with_effects(config, effects)
    }
}

impl<E: Effects> Augmenter<E> {
    /// Driver with custom effects.
    pub fn with_effects(config: PipelineConfig, effects: E) -> Result<Self> {
        config.validate()?;
        let plan = plan(&config.augmentation);
        Ok(Self {
            config,
            plan,
            effects,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn plan(&self) -> &AugmentationPlan {
        &self.plan
    }

    /// Process the whole corpus.
    ///
    /// Per-recording failures are logged and counted in the summary. Only a
    /// missing input root, an uncreatable output root or a thread-pool
    /// failure returns an error.
    pub fn run(&self) -> Result<RunSummary> {
        let corpus = Corpus::open(&self.config.input_dir)?;
        let output_root = &self.config.output_dir;
        fs::create_dir_all(output_root).map_err(|source| Error::OutputDir {
            path: output_root.clone(),
            source,
        })?;
        let pool = self.thread_pool()?;

        tracing::info!(
            input = %corpus.root().display(),
            output = %output_root.display(),
            variants = self.plan.len(),
            "Augmenting corpus"
        );

        let mut summary = RunSummary::default();
        for subject in corpus.subjects() {
            summary.subjects += 1;

            let out_dir = match ensure_subject_dir(output_root, &subject) {
                Ok(dir) => dir,
                Err(e) => {
                    tracing::error!(
                        subject = subject.id(),
                        "Cannot create output directory, skipping subject: {}",
                        e
                    );
                    summary.subjects_failed += 1;
                    continue;
                }
            };

            let recordings: Vec<PathBuf> = subject.recordings().collect();
            tracing::debug!(
                subject = subject.id(),
                recordings = recordings.len(),
                "Processing subject"
            );

            let process = |path: &PathBuf| self.process_recording(subject.id(), path, &out_dir);
            let outcomes = match &pool {
                Some(pool) => {
                    pool.install(|| recordings.par_iter().map(&process).collect::<Vec<_>>())
                }
                None => recordings.iter().map(&process).collect::<Vec<_>>(),
            };
            for outcome in &outcomes {
                summary.record(outcome);
            }
        }

        tracing::info!(
            subjects = summary.subjects,
            recordings = summary.recordings,
            artifacts = summary.artifacts_written,
            failed_recordings = summary.recordings_failed,
            failed_branches = summary.branches_failed,
            failed_variants = summary.variants_failed,
            "Augmentation finished"
        );
        Ok(summary)
    }

    /// Paths a run would write, without reading audio or touching the
    /// output tree.
    pub fn dry_run(&self) -> Result<Vec<PathBuf>> {
        let corpus = Corpus::open(&self.config.input_dir)?;
        let mut paths = Vec::new();
        for subject in corpus.subjects() {
            let out_dir = subject.output_dir(&self.config.output_dir);
            for recording in subject.recordings() {
                let stem = stem_of(&recording);
                paths.extend(
                    self.plan
                        .file_names(&stem)
                        .into_iter()
                        .map(|name| out_dir.join(name)),
                );
            }
        }
        Ok(paths)
    }

    /// Process one recording into `out_dir`, which must exist.
    pub fn process_recording(
        &self,
        subject: &str,
        path: &Path,
        out_dir: &Path,
    ) -> std::result::Result<RecordingReport, RecordingError> {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let span = tracing::info_span!("recording", subject, file = %file);
        let _enter = span.enter();

        let recording = Recording::load(subject, path).map_err(|source| {
            let err = RecordingError::Read {
                path: path.to_path_buf(),
                source,
            };
            tracing::error!("Skipping recording: {}", err);
            err
        })?;
        tracing::debug!(
            sample_rate = recording.sample_rate(),
            frames = recording.waveform().frames(),
            channels = recording.waveform().num_channels(),
            "Loaded"
        );

        let mut report = RecordingReport::new(recording.id().clone(), path.to_path_buf());

        let original = VariantSpec::Original;
        let orig_path = artifact_path(out_dir, recording.id(), &original);
        if let Err(source) = recording.write(&orig_path) {
            let err = RecordingError::WriteOriginal {
                path: orig_path,
                source,
            };
            tracing::error!("Skipping recording: {}", err);
            return Err(err);
        }
        report.artifacts.push(artifact(&recording, original, orig_path));

        for branch in self.plan.branches() {
            if let Err(err) = self.run_branch(&recording, branch, out_dir, &mut report) {
                tracing::error!(speed = %branch.speed, "Speed branch skipped: {}", err);
                report.branch_failures.push(err);
            }
        }

        tracing::debug!(written = report.artifacts.len(), "Recording done");
        Ok(report)
    }

    /// Speed-only variant, then its pitch variants. An error here means no
    /// artifact of the branch exists.
    fn run_branch(
        &self,
        recording: &Recording,
        branch: &SpeedBranch,
        out_dir: &Path,
        report: &mut RecordingReport,
    ) -> std::result::Result<(), BranchError> {
        let speed = branch.speed;
        let waveform = target_rate(recording.sample_rate(), speed.ratio())
            .and_then(|rate| self.effects.resample(recording.waveform(), rate))
            .map_err(|source| BranchError::Resample { speed, source })?;
        let sped = recording.derive(waveform);

        let variant = branch.variant();
        let path = artifact_path(out_dir, sped.id(), &variant);
        if let Err(source) = sped.write(&path) {
            return Err(BranchError::Write {
                speed,
                path,
                source,
            });
        }
        tracing::debug!(speed = %speed, sample_rate = sped.sample_rate(), "Wrote speed variant");
        report.artifacts.push(artifact(&sped, variant, path));

        for &cents in &branch.pitches {
            match self.run_pitch_variant(&sped, branch, cents, out_dir) {
                Ok(written) => report.artifacts.push(written),
                Err(err) => {
                    tracing::warn!(
                        speed = %speed,
                        cents = %cents,
                        "Pitch variant skipped: {}",
                        err
                    );
                    report.variant_failures.push(err);
                }
            }
        }
        Ok(())
    }

    fn run_pitch_variant(
        &self,
        sped: &Recording,
        branch: &SpeedBranch,
        cents: PitchShift,
        out_dir: &Path,
    ) -> std::result::Result<OutputArtifact, VariantError> {
        let speed = branch.speed;
        let waveform = self
            .effects
            .shift_pitch(sped.waveform(), cents.cents())
            .map_err(|source| VariantError::PitchShift {
                speed,
                cents,
                source,
            })?;
        let shifted = sped.derive(waveform);

        let variant = VariantSpec::SpeedPitch {
            parent: speed,
            cents,
        };
        let path = artifact_path(out_dir, shifted.id(), &variant);
        match shifted.write(&path) {
            Ok(()) => Ok(artifact(&shifted, variant, path)),
            Err(source) => Err(VariantError::Write {
                speed,
                cents,
                path,
                source,
            }),
        }
    }

    fn thread_pool(&self) -> Result<Option<rayon::ThreadPool>> {
        if self.config.jobs == 1 {
            return Ok(None);
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .thread_name(|i| format!("speechaug-{}", i))
            .build()
            .map(Some)
            .map_err(|e| Error::ThreadPool(e.to_string()))
    }
}

fn artifact_path(out_dir: &Path, id: &RecordingId, variant: &VariantSpec) -> PathBuf {
    out_dir.join(variant.file_name(&id.stem))
}

fn artifact(recording: &Recording, variant: VariantSpec, path: PathBuf) -> OutputArtifact {
    OutputArtifact {
        id: recording.id().clone(),
        variant,
        path,
        sample_rate: recording.sample_rate(),
    }
}
