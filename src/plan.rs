//! Augmentation planning and the artifact naming contract.
//!
//! A plan is a list of speed branches. Each branch owns the pitch shifts
//! that are applied to its output, so a pitch variant can only be reached
//! through the speed variant it derives from.

use std::fmt;

use crate::config::{AugmentationConfig, PitchShift, SpeedFactor};

/// Extension of every artifact.
pub const ARTIFACT_EXTENSION: &str = "wav";

/// One requested output of a recording.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariantSpec {
    /// The source waveform, re-encoded unchanged.
    Original,
    /// Speed-perturbed only.
    Speed(SpeedFactor),
    /// Pitch-shifted output of the `parent` speed variant.
    SpeedPitch {
        parent: SpeedFactor,
        cents: PitchShift,
    },
}

impl VariantSpec {
    pub fn speed(&self) -> Option<SpeedFactor> {
        match self {
            VariantSpec::Original => None,
            VariantSpec::Speed(speed) => Some(*speed),
            VariantSpec::SpeedPitch { parent, .. } => Some(*parent),
        }
    }

    pub fn pitch(&self) -> Option<PitchShift> {
        match self {
            VariantSpec::SpeedPitch { cents, .. } => Some(*cents),
            _ => None,
        }
    }

    /// Suffix appended to the stem: `orig`, `speed0.9`, `speed0.9_pitch+100`.
    pub fn tag(&self) -> String {
        match self {
            VariantSpec::Original => "orig".to_string(),
            VariantSpec::Speed(speed) => format!("speed{}", speed.label()),
            VariantSpec::SpeedPitch { parent, cents } => {
                format!("speed{}_pitch{}", parent.label(), cents)
            }
        }
    }

    /// Artifact file name for a recording stem.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}_{}.{}", stem, self.tag(), ARTIFACT_EXTENSION)
    }
}

impl fmt::Display for VariantSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

/// A speed factor and the pitch shifts applied to its output.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedBranch {
    pub speed: SpeedFactor,
    pub pitches: Vec<PitchShift>,
}

impl SpeedBranch {
    /// The speed-only variant this branch produces first.
    pub fn variant(&self) -> VariantSpec {
        VariantSpec::Speed(self.speed)
    }

    /// Pitch variants of this branch, in configured order.
    pub fn pitch_variants(&self) -> impl Iterator<Item = VariantSpec> + '_ {
        self.pitches.iter().map(move |&cents| VariantSpec::SpeedPitch {
            parent: self.speed,
            cents,
        })
    }
}

/// Ordered expansion of a recording into variants.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentationPlan {
    branches: Vec<SpeedBranch>,
}

impl AugmentationPlan {
    pub fn branches(&self) -> &[SpeedBranch] {
        &self.branches
    }

    /// Flat execution order: original, then each speed variant followed by
    /// its pitch variants.
    pub fn variants(&self) -> Vec<VariantSpec> {
        let mut out = Vec::with_capacity(self.len());
        out.push(VariantSpec::Original);
        for branch in &self.branches {
            out.push(branch.variant());
            out.extend(branch.pitch_variants());
        }
        out
    }

    /// Number of variants, `1 + S + S·P`.
    pub fn len(&self) -> usize {
        1 + self
            .branches
            .iter()
            .map(|b| 1 + b.pitches.len())
            .sum::<usize>()
    }

    /// A plan always holds the original.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Artifact file names for `stem`, in execution order.
    pub fn file_names(&self, stem: &str) -> Vec<String> {
        self.variants().iter().map(|v| v.file_name(stem)).collect()
    }
}

/// Expand a configuration into its plan. Pure and deterministic.
pub fn plan(config: &AugmentationConfig) -> AugmentationPlan {
    let branches = config
        .speeds()
        .iter()
        .map(|&speed| SpeedBranch {
            speed,
            pitches: config.pitches().to_vec(),
        })
        .collect();
    AugmentationPlan { branches }
}
