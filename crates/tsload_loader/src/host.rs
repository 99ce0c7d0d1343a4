//! The bundler side of an invocation.

use std::path::{Path, PathBuf};

use tsload_diagnostics::{CollectingReporter, DiagnosticReporter};

/// What the loader needs from the bundler during one invocation.
///
/// Warnings and errors arrive through the [`DiagnosticReporter`] supertrait.
pub trait LoaderHost: DiagnosticReporter {
    /// Declares whether the output may be cached by the bundler.
    fn set_cacheable(&mut self, cacheable: bool);

    /// Declares that the output depends on `path`, so the bundler rebuilds
    /// when it changes.
    fn add_dependency(&mut self, path: &Path);
}

/// A host that records everything it is told.
///
/// Suitable for batch tools that print diagnostics after the fact, and for tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingHost {
    /// Reported warnings and errors.
    pub reporter: CollectingReporter,
    /// Declared dependencies, in order.
    pub dependencies: Vec<PathBuf>,
    /// The last cacheability declaration.
    pub cacheable: Option<bool>,
}

impl RecordingHost {
    /// Creates an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reported warnings.
    pub fn warnings(&self) -> &[String] {
        &self.reporter.warnings
    }

    /// Reported errors.
    pub fn errors(&self) -> &[String] {
        &self.reporter.errors
    }
}

impl DiagnosticReporter for RecordingHost {
    fn report_warning(&mut self, message: String) {
        self.reporter.report_warning(message);
    }

    fn report_error(&mut self, message: String) {
        self.reporter.report_error(message);
    }
}

impl LoaderHost for RecordingHost {
    fn set_cacheable(&mut self, cacheable: bool) {
        self.cacheable = Some(cacheable);
    }

    fn add_dependency(&mut self, path: &Path) {
        self.dependencies.push(path.to_path_buf());
    }
}
