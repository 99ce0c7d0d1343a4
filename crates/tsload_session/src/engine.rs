//! The compiler-engine boundary.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tsload_diagnostics::Diagnostic;
use tsload_source::{normalize, Snapshot, SourceError};

/// Filesystem services the engine uses while resolving references.
///
/// The loader implements this over its snapshot cache, so files read during
/// resolution are the same snapshots later registered with the session.
pub trait ResolverHost {
    /// Returns the current snapshot of `path`.
    fn snapshot(&mut self, path: &Path) -> Result<Snapshot, SourceError>;

    /// Returns `true` if a file or directory exists at `path`.
    fn file_exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is an existing directory.
    fn directory_exists(&self, path: &Path) -> bool;

    /// Returns the parent of `path`, or `None` at the root.
    fn parent_directory(&self, path: &Path) -> Option<PathBuf>;

    /// Resolves a reference written in a file located in directory `from`.
    fn resolve_relative_path(&self, file: &str, from: &Path) -> PathBuf {
        normalize(&from.join(file))
    }
}

/// One file found while resolving an entry's dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Files this file references directly.
    pub referenced_files: Vec<PathBuf>,
}

/// Result of resolving the dependency graph of a set of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Every file in the graph, entries included.
    pub resolved_files: Vec<ResolvedFile>,
    /// Problems found while resolving (missing files, bad references).
    pub diagnostics: Vec<Diagnostic>,
}

/// What an emitted artifact contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Generated code.
    Code,
    /// A source map for the generated code.
    SourceMap,
    /// A declaration file or any other output the loader does not use.
    Other,
}

/// One output file produced by [`CompilerEngine::emit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitArtifact {
    /// Virtual output name, such as `a.js` or `a.js.map`.
    pub name: String,
    /// What the artifact contains.
    pub kind: ArtifactKind,
    /// The artifact text.
    pub text: String,
}

impl EmitArtifact {
    /// Creates an artifact.
    pub fn new(name: impl Into<String>, kind: ArtifactKind, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            text: text.into(),
        }
    }
}

/// The engine hit a module path it cannot resolve while emitting.
///
/// There is no recovery for this; it is surfaced to the host as a fault,
/// never folded into the ordinary compilation-failure message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no way to resolve path {path} during emit")]
pub struct EmitFailure {
    /// The path the engine asked about.
    pub path: PathBuf,
}

/// A persistent compiler instance.
///
/// Registering a path that is already known replaces its content.
pub trait CompilerEngine {
    /// Resolves the transitive references of `entries`.
    fn resolve_references(&mut self, entries: &[PathBuf], host: &mut dyn ResolverHost) -> Resolution;

    /// Adds or replaces a file.
    fn register_file(&mut self, path: &Path, content: Arc<str>, references: &[PathBuf]);

    /// Syntax diagnostics for a registered file.
    fn syntactic_diagnostics(&mut self, path: &Path) -> Vec<Diagnostic>;

    /// Type-checking diagnostics for a registered file.
    fn semantic_diagnostics(&mut self, path: &Path) -> Vec<Diagnostic>;

    /// Emits code (and a source map, if enabled) for `entry`.
    fn emit(&mut self, entry: &Path) -> Result<Vec<EmitArtifact>, EmitFailure>;
}

impl<E: CompilerEngine + ?Sized> CompilerEngine for Box<E> {
    fn resolve_references(&mut self, entries: &[PathBuf], host: &mut dyn ResolverHost) -> Resolution {
        (**self).resolve_references(entries, host)
    }

    fn register_file(&mut self, path: &Path, content: Arc<str>, references: &[PathBuf]) {
        (**self).register_file(path, content, references)
    }

    fn syntactic_diagnostics(&mut self, path: &Path) -> Vec<Diagnostic> {
        (**self).syntactic_diagnostics(path)
    }

    fn semantic_diagnostics(&mut self, path: &Path) -> Vec<Diagnostic> {
        (**self).semantic_diagnostics(path)
    }

    fn emit(&mut self, entry: &Path) -> Result<Vec<EmitArtifact>, EmitFailure> {
        (**self).emit(entry)
    }
}
