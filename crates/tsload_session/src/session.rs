//! The persistent compiler session.

use std::path::{Path, PathBuf};

use tsload_diagnostics::Diagnostic;
use tsload_source::Snapshot;

use crate::engine::{CompilerEngine, EmitArtifact, EmitFailure, Resolution, ResolverHost};
use crate::registration::SessionRegistration;

/// A compiler engine plus the record of what it has been given.
///
/// Created once per host process (or per isolated worker) and reused across
/// invocations. Not synchronized: one invocation must finish before the next
/// touches the session.
pub struct CompilationSession<E> {
    engine: E,
    registration: SessionRegistration,
}

impl<E: CompilerEngine> CompilationSession<E> {
    /// Wraps an engine with an empty registration table.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            registration: SessionRegistration::new(),
        }
    }

    /// Resolves the dependency graph of `entries`.
    pub fn resolve(&mut self, entries: &[PathBuf], host: &mut dyn ResolverHost) -> Resolution {
        self.engine.resolve_references(entries, host)
    }

    /// Gives the engine a snapshot's content and records its stamp.
    pub fn register(&mut self, snapshot: &Snapshot, references: &[PathBuf], pinned: bool) {
        tracing::debug!(
            path = %snapshot.path().display(),
            stamp = %snapshot.stamp(),
            pinned,
            "registering file with compiler session"
        );
        self.engine
            .register_file(snapshot.path(), snapshot.shared_content(), references);
        self.registration
            .record(snapshot.path(), snapshot.stamp(), pinned);
    }

    /// Forgets every registration, forcing a full re-registration pass.
    ///
    /// Files stay loaded in the engine; they are replaced as they are
    /// registered again.
    pub fn clear_registrations(&mut self) {
        tracing::debug!(count = self.registration.len(), "clearing session registrations");
        self.registration.clear();
    }

    /// The registration table.
    pub fn registration(&self) -> &SessionRegistration {
        &self.registration
    }

    /// Syntax diagnostics for `path`.
    pub fn syntactic_diagnostics(&mut self, path: &Path) -> Vec<Diagnostic> {
        self.engine.syntactic_diagnostics(path)
    }

    /// Type-checking diagnostics for `path`.
    pub fn semantic_diagnostics(&mut self, path: &Path) -> Vec<Diagnostic> {
        self.engine.semantic_diagnostics(path)
    }

    /// Emits output for `entry`.
    pub fn emit(&mut self, entry: &Path) -> Result<Vec<EmitArtifact>, EmitFailure> {
        self.engine.emit(entry)
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The wrapped engine, mutably.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
