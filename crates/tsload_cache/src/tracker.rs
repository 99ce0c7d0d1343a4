//! Decides, per path, whether the compiler session must be given a file again.

use std::path::{Path, PathBuf};

use tsload_session::{CompilationSession, CompilerEngine};
use tsload_source::{FileSystem, SourceError};

use crate::store::SnapshotStore;

/// What [`DependencyTracker::register_if_needed`] did for one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The session already held the current version; nothing was sent.
    Unchanged,
    /// The path was not registered before and now is.
    Added,
    /// The path was registered at a stale version and has been replaced.
    Updated,
}

/// Per-invocation record of registration decisions.
///
/// Files appear in the order they were processed. A path processed twice in
/// one invocation appears twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationSummary {
    /// Files registered for the first time (or after a wipe).
    pub new_files: Vec<PathBuf>,
    /// Files re-registered because they changed.
    pub modified_files: Vec<PathBuf>,
    /// Files skipped because the session was already current.
    pub unchanged_files: Vec<PathBuf>,
}

impl RegistrationSummary {
    /// Returns `true` if nothing was sent to the session.
    pub fn nothing_registered(&self) -> bool {
        self.new_files.is_empty() && self.modified_files.is_empty()
    }

    /// Number of registrations sent to the session.
    pub fn dirty_count(&self) -> usize {
        self.new_files.len() + self.modified_files.len()
    }

    fn record(&mut self, path: &Path, outcome: RegistrationOutcome) {
        let bucket = match outcome {
            RegistrationOutcome::Unchanged => &mut self.unchanged_files,
            RegistrationOutcome::Added => &mut self.new_files,
            RegistrationOutcome::Updated => &mut self.modified_files,
        };
        bucket.push(path.to_path_buf());
    }
}

/// Keeps the compiler session's registrations in step with the filesystem.
///
/// Borrows the process-wide store and session for the span of one invocation.
pub struct DependencyTracker<'a, F, E> {
    store: &'a mut SnapshotStore<F>,
    session: &'a mut CompilationSession<E>,
    summary: RegistrationSummary,
}

impl<'a, F: FileSystem, E: CompilerEngine> DependencyTracker<'a, F, E> {
    /// Creates a tracker over a store and a session.
    pub fn new(store: &'a mut SnapshotStore<F>, session: &'a mut CompilationSession<E>) -> Self {
        Self {
            store,
            session,
            summary: RegistrationSummary::default(),
        }
    }

    /// Registers `path` with the session unless it already holds the current version.
    ///
    /// Stats the file once. If the session's recorded stamp for `path` is
    /// still current under the store's policy and mode, nothing is read or
    /// sent. Otherwise the current snapshot is registered together with
    /// `references`, and the session records the snapshot's stamp. Pinned
    /// paths (the standard library) are always left alone.
    pub fn register_if_needed(
        &mut self,
        path: &Path,
        references: &[PathBuf],
    ) -> Result<RegistrationOutcome, SourceError> {
        let registration = self.session.registration().get(path).copied();
        if registration.is_some_and(|r| r.pinned) {
            tracing::trace!(path = %path.display(), "pinned file, skipping invalidation check");
            self.summary.record(path, RegistrationOutcome::Unchanged);
            return Ok(RegistrationOutcome::Unchanged);
        }

        let current = self.store.current_stamp(path)?;
        if let Some(registered) = registration {
            if self.store.is_current(path, registered.stamp, current) {
                tracing::trace!(path = %path.display(), "session registration is current");
                self.summary.record(path, RegistrationOutcome::Unchanged);
                return Ok(RegistrationOutcome::Unchanged);
            }
        }

        let snapshot = self.store.snapshot_at(path, current)?;
        self.session.register(&snapshot, references, false);
        let outcome = if registration.is_some() {
            RegistrationOutcome::Updated
        } else {
            RegistrationOutcome::Added
        };
        self.summary.record(path, outcome);
        Ok(outcome)
    }

    /// Registers the compiler's standard-library definition file.
    ///
    /// Happens once per session lifetime: once present, the file is pinned and
    /// never checked again until [`clear_all`](Self::clear_all) wipes the
    /// registration table.
    pub fn register_default_lib(&mut self, path: &Path) -> Result<RegistrationOutcome, SourceError> {
        if self.session.registration().contains(path) {
            self.summary.record(path, RegistrationOutcome::Unchanged);
            return Ok(RegistrationOutcome::Unchanged);
        }
        let snapshot = self.store.get_snapshot(path)?;
        tracing::debug!(path = %path.display(), "registering standard library");
        self.session.register(&snapshot, &[], true);
        self.summary.record(path, RegistrationOutcome::Added);
        Ok(RegistrationOutcome::Added)
    }

    /// Wipes every session registration, forcing a full re-registration pass.
    pub fn clear_all(&mut self) {
        self.session.clear_registrations();
    }

    /// Decisions made so far.
    pub fn summary(&self) -> &RegistrationSummary {
        &self.summary
    }

    /// Ends the tracker, returning its decisions.
    pub fn into_summary(self) -> RegistrationSummary {
        self.summary
    }
}
