//! Immutable captured file content.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::SourceError;
use crate::fs::FileSystem;
use crate::stamp::VersionStamp;

/// A file's content captured at a point in time, tagged with the version
/// stamp it was captured under.
///
/// Snapshots are never mutated. When a file changes, the cache replaces its
/// snapshot with a new one. Cloning is cheap; the text is shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    path: PathBuf,
    content: Arc<str>,
    stamp: VersionStamp,
}

impl Snapshot {
    /// Creates a snapshot from text already in memory.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Arc<str>>, stamp: VersionStamp) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            stamp,
        }
    }

    /// Reads `path` from `fs` and tags the result with `stamp`.
    ///
    /// `stamp` must have been taken before the read. If the file changes in
    /// between, the snapshot is tagged older than its content and the next
    /// stamp comparison re-reads it, never the reverse.
    pub fn read(fs: &dyn FileSystem, path: &Path, stamp: VersionStamp) -> Result<Self, SourceError> {
        let bytes = fs.read(path).map_err(|e| SourceError::io(path, e))?;
        let text = String::from_utf8(bytes).map_err(|_| SourceError::InvalidUtf8 {
            path: path.to_path_buf(),
        })?;
        Ok(Self::new(path, text, stamp))
    }

    /// The path this snapshot was captured from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The captured text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// A shared handle to the captured text.
    pub fn shared_content(&self) -> Arc<str> {
        Arc::clone(&self.content)
    }

    /// The version stamp the content was captured under.
    pub fn stamp(&self) -> VersionStamp {
        self.stamp
    }
}
