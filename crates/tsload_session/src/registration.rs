//! Which version of each file the compiler session currently holds.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tsload_source::VersionStamp;

/// The session's record of one registered path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Stamp of the snapshot the engine was given.
    pub stamp: VersionStamp,
    /// Pinned entries (the standard library) are never checked for staleness.
    pub pinned: bool,
}

/// Maps each registered path to the stamp of the content the engine holds.
///
/// Last write wins: recording a path replaces its previous entry, so a path
/// never has two stamps at once.
#[derive(Debug, Default, Clone)]
pub struct SessionRegistration {
    entries: HashMap<PathBuf, Registration>,
}

impl SessionRegistration {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the engine now holds `path` at `stamp`.
    pub fn record(&mut self, path: &Path, stamp: VersionStamp, pinned: bool) {
        self.entries
            .insert(path.to_path_buf(), Registration { stamp, pinned });
    }

    /// The registration for `path`, if any.
    pub fn get(&self, path: &Path) -> Option<&Registration> {
        self.entries.get(path)
    }

    /// The stamp `path` was registered at, if any.
    pub fn stamp_of(&self, path: &Path) -> Option<VersionStamp> {
        self.entries.get(path).map(|r| r.stamp)
    }

    /// Returns `true` if `path` is registered.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Returns `true` if `path` is registered and pinned.
    pub fn is_pinned(&self, path: &Path) -> bool {
        self.entries.get(path).is_some_and(|r| r.pinned)
    }

    /// Forgets every registration.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of registered paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over registered paths and their entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Registration)> {
        self.entries.iter().map(|(p, r)| (p.as_path(), r))
    }
}
