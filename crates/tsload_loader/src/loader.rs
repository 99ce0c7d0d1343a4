//! The loader service object and its per-invocation pipeline.

use std::path::{Path, PathBuf};

use tsload_cache::{
    AlwaysTrustCache, CacheMode, CheckModificationTime, DependencyTracker, InvalidationPolicy,
    RegistrationSummary, SnapshotStore,
};
use tsload_common::InternalError;
use tsload_config::{ConfigError, InvalidationStrategy, LoaderConfig, LoaderOptions};
use tsload_diagnostics::{Diagnostic, DiagnosticAggregator, Phase};
use tsload_emit::{CompilationResult, OutputExtractor};
use tsload_session::{CompilationSession, CompilerEngine};
use tsload_source::{normalize, FileSystem};

use crate::error::LoaderError;
use crate::host::LoaderHost;

/// The message delivered to the host when any checked phase fails.
pub const FAILURE_MESSAGE: &str = "Failed during compilation";

/// One file handed to the loader by the bundler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderRequest {
    /// Absolute path of the file being transformed.
    pub resource_path: PathBuf,
    /// The file's text as the bundler read it. Used verbatim as the source
    /// map's `sourcesContent`.
    pub source: String,
    /// Per-invocation options.
    pub options: LoaderOptions,
}

impl LoaderRequest {
    /// Creates a request with default options.
    pub fn new(resource_path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            resource_path: resource_path.into(),
            source: source.into(),
            options: LoaderOptions::default(),
        }
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Creates a request whose options come from a loader query string.
    pub fn from_query(
        resource_path: impl Into<PathBuf>,
        source: impl Into<String>,
        query: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(resource_path, source).with_options(LoaderOptions::from_query(query)?))
    }
}

/// Incremental compilation service for one host process or worker.
///
/// Owns the [`SnapshotStore`] and [`CompilationSession`] that persist across
/// invocations. Invocations must not overlap: give each concurrently running
/// pipeline its own `Loader`.
pub struct Loader<F, E> {
    config: LoaderConfig,
    store: SnapshotStore<F>,
    session: CompilationSession<E>,
    extractor: OutputExtractor,
    last_summary: RegistrationSummary,
}

impl<F: FileSystem, E: CompilerEngine> Loader<F, E> {
    /// Creates a loader with an empty cache around `engine`.
    ///
    /// A relative `build.root` is resolved against the current directory.
    /// `compiler.default_lib` is normalized so it matches the paths the
    /// engine resolves references to.
    pub fn new(mut config: LoaderConfig, fs: F, engine: E) -> Self {
        config.compiler.default_lib = normalize(&config.compiler.default_lib);
        let policy: Box<dyn InvalidationPolicy> = match config.cache.invalidation {
            InvalidationStrategy::ModificationTime => Box::new(CheckModificationTime),
            InvalidationStrategy::TrustCache => Box::new(AlwaysTrustCache),
        };
        let extractor = OutputExtractor::new(absolute_root(&config.build.root))
            .with_source_maps(config.compiler.source_maps);
        tracing::debug!(
            root = %extractor.build_root().display(),
            default_lib = %config.compiler.default_lib.display(),
            invalidation = ?config.cache.invalidation,
            "created loader"
        );
        Self {
            store: SnapshotStore::with_policy(fs, policy),
            session: CompilationSession::new(engine),
            extractor,
            last_summary: RegistrationSummary::default(),
            config,
        }
    }

    /// Compiles one file, returning its code and normalized source map.
    ///
    /// Warnings and errors are reported to `host` as they are found. A phase
    /// that reports an error ends the invocation with
    /// [`LoaderError::CompilationFailed`]; later phases never run.
    pub fn compile(
        &mut self,
        request: &LoaderRequest,
        host: &mut dyn LoaderHost,
    ) -> Result<CompilationResult, LoaderError> {
        host.set_cacheable(true);
        self.last_summary = RegistrationSummary::default();

        let entry = normalize(&request.resource_path);
        let cache_enabled = self.config.cache.enabled && request.options.cache;
        self.store.set_mode(CacheMode::from_enabled(cache_enabled));
        tracing::debug!(path = %entry.display(), cache = cache_enabled, "compiling");

        let mut aggregator = DiagnosticAggregator::new();

        let resolution = self
            .session
            .resolve(std::slice::from_ref(&entry), &mut self.store);
        aggregator.check_phase(&mut *host, Phase::Resolution, resolution.diagnostics)?;
        if !resolution.resolved_files.iter().any(|f| f.path == entry) {
            return Err(InternalError::new(format!(
                "resolution of {} succeeded without including it",
                entry.display()
            ))
            .into());
        }

        let default_lib = &self.config.compiler.default_lib;
        host.add_dependency(default_lib);
        let mut tracker = DependencyTracker::new(&mut self.store, &mut self.session);
        if !cache_enabled {
            tracker.clear_all();
        }
        tracker.register_default_lib(default_lib)?;
        for file in &resolution.resolved_files {
            if file.path != *default_lib {
                host.add_dependency(&file.path);
            }
            tracker.register_if_needed(&file.path, &file.referenced_files)?;
        }
        let summary = tracker.into_summary();
        tracing::debug!(
            new = summary.new_files.len(),
            modified = summary.modified_files.len(),
            unchanged = summary.unchanged_files.len(),
            "registration pass complete"
        );
        self.last_summary = summary;

        let files: Vec<&Path> = resolution
            .resolved_files
            .iter()
            .map(|f| f.path.as_path())
            .collect();

        let syntax: Vec<Diagnostic> = files
            .iter()
            .flat_map(|path| self.session.syntactic_diagnostics(path))
            .collect();
        aggregator.check_phase(&mut *host, Phase::Syntax, syntax)?;

        let semantic: Vec<Diagnostic> = files
            .iter()
            .flat_map(|path| self.session.semantic_diagnostics(path))
            .collect();
        aggregator.check_phase(&mut *host, Phase::Semantic, semantic)?;

        let artifacts = self.session.emit(&entry)?;
        let result = self.extractor.extract(artifacts, &entry, &request.source)?;
        tracing::debug!(
            path = %entry.display(),
            warnings = aggregator.warning_count(),
            source_map = result.source_map.is_some(),
            "compiled"
        );
        Ok(result)
    }

    /// Compiles one file and delivers the outcome through `callback`.
    ///
    /// The callback runs exactly once when compilation succeeds or fails
    /// ordinarily; the failure message is always [`FAILURE_MESSAGE`]. Faults
    /// (unreadable files, emit failures, malformed output) are returned
    /// instead and the callback is not invoked.
    pub fn run<C>(
        &mut self,
        request: &LoaderRequest,
        host: &mut dyn LoaderHost,
        callback: C,
    ) -> Result<(), LoaderError>
    where
        C: FnOnce(Result<CompilationResult, String>),
    {
        match self.compile(request, host) {
            Ok(result) => {
                callback(Ok(result));
                Ok(())
            }
            Err(LoaderError::CompilationFailed { phase }) => {
                tracing::debug!(%phase, "compilation failed");
                callback(Err(FAILURE_MESSAGE.to_string()));
                Ok(())
            }
            Err(fault) => {
                tracing::warn!(error = %fault, "loader fault");
                Err(fault)
            }
        }
    }

    /// Drops every cached snapshot and session registration.
    ///
    /// The next invocation reads and registers every file it touches,
    /// including the standard library.
    pub fn reset(&mut self) {
        self.store.clear();
        self.session.clear_registrations();
        self.last_summary = RegistrationSummary::default();
    }

    /// What the most recent invocation registered and skipped.
    ///
    /// Empty when that invocation stopped before finishing its registration pass.
    pub fn last_registration_summary(&self) -> &RegistrationSummary {
        &self.last_summary
    }

    /// The configuration this loader was created with.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// The snapshot store.
    pub fn store(&self) -> &SnapshotStore<F> {
        &self.store
    }

    /// The compiler session.
    pub fn session(&self) -> &CompilationSession<E> {
        &self.session
    }

    /// The compiler session, mutably.
    pub fn session_mut(&mut self) -> &mut CompilationSession<E> {
        &mut self.session
    }
}

fn absolute_root(root: &Path) -> PathBuf {
    if root.is_absolute() {
        return normalize(root);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize(&cwd.join(root)),
        Err(err) => {
            tracing::warn!(error = %err, "cannot read current directory, keeping relative build root");
            normalize(root)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use std::sync::Arc;
    use tsload_session::testing::{EngineCall, ScriptedEngine};
    use tsload_source::MemoryFileSystem;

    const LIB: &str = "/lib/lib.d.ts";

    fn loader(files: &[(&str, &str)]) -> (Arc<MemoryFileSystem>, Loader<Arc<MemoryFileSystem>, ScriptedEngine>) {
        let fs = Arc::new(MemoryFileSystem::new());
        fs.write(LIB, "declare var undefined: any;");
        for (path, text) in files {
            fs.write(*path, *text);
        }
        let mut config = LoaderConfig::new(LIB);
        config.build.root = PathBuf::from("/project");
        let loader = Loader::new(config, Arc::clone(&fs), ScriptedEngine::new());
        (fs, loader)
    }

    #[test]
    fn request_from_query() {
        let req = LoaderRequest::from_query("/a.ts", "var a;", "?cache=false").unwrap();
        assert!(!req.options.cache);
        let req = LoaderRequest::from_query("/a.ts", "var a;", "").unwrap();
        assert!(req.options.cache);
    }

    #[test]
    fn absolute_root_is_normalized() {
        assert_eq!(
            absolute_root(Path::new("/project/./src/..")),
            PathBuf::from("/project")
        );
    }

    #[test]
    fn default_lib_is_normalized() {
        let fs = Arc::new(MemoryFileSystem::new());
        let loader = Loader::new(
            LoaderConfig::new("/lib/../lib/./lib.d.ts"),
            fs,
            ScriptedEngine::new(),
        );
        assert_eq!(
            loader.config().compiler.default_lib,
            PathBuf::from("/lib/lib.d.ts")
        );
    }

    #[test]
    fn relative_root_is_made_absolute() {
        assert!(absolute_root(Path::new("build")).is_absolute());
    }

    #[test]
    fn compile_declares_cacheable_and_dependencies() {
        let (_fs, mut loader) = loader(&[("/project/a.ts", "var a = 1;")]);
        let mut host = RecordingHost::new();
        let req = LoaderRequest::new("/project/a.ts", "var a = 1;");
        loader.compile(&req, &mut host).unwrap();

        assert_eq!(host.cacheable, Some(true));
        assert_eq!(
            host.dependencies,
            vec![PathBuf::from(LIB), PathBuf::from("/project/a.ts")]
        );
    }

    #[test]
    fn pipeline_order() {
        let (_fs, mut loader) = loader(&[("/project/a.ts", "var a = 1;")]);
        let mut host = RecordingHost::new();
        let req = LoaderRequest::new("/project/a.ts", "var a = 1;");
        loader.compile(&req, &mut host).unwrap();

        let a = PathBuf::from("/project/a.ts");
        assert_eq!(
            loader.session().engine().calls(),
            &[
                EngineCall::Resolve(vec![a.clone()]),
                EngineCall::Register(PathBuf::from(LIB)),
                EngineCall::Register(a.clone()),
                EngineCall::Syntactic(a.clone()),
                EngineCall::Semantic(a.clone()),
                EngineCall::Emit(a),
            ]
        );
    }

    #[test]
    fn reset_forces_full_registration() {
        let (_fs, mut loader) = loader(&[("/project/a.ts", "var a = 1;")]);
        let mut host = RecordingHost::new();
        let req = LoaderRequest::new("/project/a.ts", "var a = 1;");
        loader.compile(&req, &mut host).unwrap();
        loader.reset();
        assert!(loader.store().is_empty());
        assert!(loader.last_registration_summary().new_files.is_empty());

        loader.session_mut().engine_mut().clear_calls();
        loader.compile(&req, &mut host).unwrap();
        assert_eq!(
            loader.session().engine().registered_paths(),
            vec![PathBuf::from(LIB), PathBuf::from("/project/a.ts")]
        );
    }

    #[test]
    fn semantic_failure_reports_and_fails() {
        let (_fs, mut loader) = loader(&[("/project/a.ts", "var a: number = 'x';")]);
        loader.session_mut().engine_mut().set_semantic_diagnostics(
            "/project/a.ts",
            vec![Diagnostic::error("/project/a.ts", 0, 4, "Type mismatch.")],
        );
        let mut host = RecordingHost::new();
        let req = LoaderRequest::new("/project/a.ts", "var a: number = 'x';");
        let err = loader.compile(&req, &mut host).unwrap_err();

        assert!(matches!(
            err,
            LoaderError::CompilationFailed {
                phase: Phase::Semantic
            }
        ));
        assert_eq!(host.errors(), ["/project/a.ts(1,5) Type mismatch."]);
        assert!(!loader
            .session()
            .engine()
            .calls()
            .iter()
            .any(|c| matches!(c, EngineCall::Emit(_))));
    }

    #[test]
    fn warnings_do_not_fail() {
        let (_fs, mut loader) = loader(&[("/project/a.ts", "var a;")]);
        loader.session_mut().engine_mut().set_syntax_diagnostics(
            "/project/a.ts",
            vec![Diagnostic::warning("/project/a.ts", 2, 0, "Unreachable code.")],
        );
        let mut host = RecordingHost::new();
        let result = loader
            .compile(&LoaderRequest::new("/project/a.ts", "var a;"), &mut host)
            .unwrap();
        assert_eq!(result.code, "var a;\n\n");
        assert_eq!(host.warnings(), ["/project/a.ts(3,1) Unreachable code."]);
        assert!(host.errors().is_empty());
    }
}
