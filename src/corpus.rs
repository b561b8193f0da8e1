//! Corpus traversal.
//!
//! A corpus is `ROOT/<subject>/<file>.wav`. Enumeration here is pure: it
//! never touches the output tree. Mirroring a subject into the output root
//! is the separate, idempotent [`ensure_subject_dir`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};

/// File-name suffix of a recording. Matched case-sensitively.
pub const AUDIO_SUFFIX: &str = ".wav";

/// Input corpus rooted at a directory.
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
}

impl Corpus {
    /// Open a corpus. Fails if `root` is missing or not a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        match fs::metadata(&root) {
            Ok(meta) if meta.is_dir() => Ok(Self { root }),
            Ok(_) => Err(Error::InputNotADirectory(root)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::InputNotFound(root)),
            Err(e) => Err(Error::Io(e)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Subject directories in file-name order.
    ///
    /// Only direct children of the root that are directories (following
    /// symlinks) are subjects. Other entries are skipped.
    pub fn subjects(&self) -> impl Iterator<Item = SubjectDir> {
        children(&self.root).filter_map(|entry| {
            if !entry.file_type().is_dir() {
                return None;
            }
            match entry.file_name().to_str() {
                Some(id) => Some(SubjectDir {
                    id: id.to_string(),
                    path: entry.path().to_path_buf(),
                }),
                None => {
                    tracing::warn!(
                        "Skipping subject with non UTF-8 name: {}",
                        entry.path().display()
                    );
                    None
                }
            }
        })
    }

    /// Every `(subject id, recording path)` pair in the corpus.
    pub fn recordings(&self) -> impl Iterator<Item = (String, PathBuf)> {
        self.subjects().flat_map(|subject| {
            let id = subject.id.clone();
            subject.recordings().map(move |path| (id.clone(), path))
        })
    }
}

/// One subject directory of the input corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectDir {
    id: String,
    path: PathBuf,
}

impl SubjectDir {
    /// Directory name, used as the speaker label downstream.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Recording files of this subject in file-name order.
    pub fn recordings(&self) -> impl Iterator<Item = PathBuf> {
        children(&self.path)
            .filter(|entry| is_recording(entry))
            .map(DirEntry::into_path)
    }

    /// Where this subject's artifacts go under `output_root`.
    pub fn output_dir(&self, output_root: &Path) -> PathBuf {
        output_root.join(&self.id)
    }
}

/// Create the mirrored output directory for `subject`. Safe to repeat.
pub fn ensure_subject_dir(output_root: &Path, subject: &SubjectDir) -> io::Result<PathBuf> {
    let dir = subject.output_dir(output_root);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Direct children of `dir`, sorted by name. Unreadable entries are logged
/// and skipped.
fn children(dir: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Error accessing entry: {}", e);
                None
            }
        })
}

fn is_recording(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(AUDIO_SUFFIX))
}
