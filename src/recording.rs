//! Source recordings and the variants derived from them.

use std::fmt;
use std::path::Path;

use speechaug_codec::{BitDepth, CodecError};
use speechaug_core::Waveform;

/// Identity of a recording: its subject and its file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordingId {
    pub subject: String,
    pub stem: String,
}

impl RecordingId {
    pub fn new(subject: impl Into<String>, stem: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            stem: stem.into(),
        }
    }
}

impl fmt::Display for RecordingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.subject, self.stem)
    }
}

/// A decoded recording. Transforms produce new recordings that keep the
/// id and sample encoding of their source.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    id: RecordingId,
    waveform: Waveform,
    bit_depth: BitDepth,
}

impl Recording {
    pub fn new(id: RecordingId, waveform: Waveform, bit_depth: BitDepth) -> Self {
        Self {
            id,
            waveform,
            bit_depth,
        }
    }

    /// Decode `path` as a recording of `subject`. The stem is the file name
    /// without its final extension.
    pub fn load(subject: &str, path: &Path) -> Result<Self, CodecError> {
        let stem = stem_of(path);
        let decoded = speechaug_codec::read_file(path)?;
        Ok(Self::new(
            RecordingId::new(subject, stem),
            decoded.waveform,
            decoded.bit_depth,
        ))
    }

    pub fn id(&self) -> &RecordingId {
        &self.id
    }

    pub fn waveform(&self) -> &Waveform {
        &self.waveform
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    pub fn sample_rate(&self) -> u32 {
        self.waveform.sample_rate()
    }

    /// A recording with the same identity and encoding holding `waveform`.
    pub fn derive(&self, waveform: Waveform) -> Self {
        Self {
            id: self.id.clone(),
            waveform,
            bit_depth: self.bit_depth,
        }
    }

    /// Encode to `path` in the source encoding. Either the whole file
    /// appears or nothing does.
    pub fn write(&self, path: &Path) -> Result<(), CodecError> {
        speechaug_codec::write_file(path, &self.waveform, self.bit_depth)
    }
}

/// File name of `path` without its final extension.
pub fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
