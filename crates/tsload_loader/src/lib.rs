//! Bundler integration for an incremental, type-checking compiler.
//!
//! A [`Loader`] is created once per host process (or per isolated worker) and
//! handles every file the bundler passes through it. Each invocation resolves
//! the file's dependency graph, brings the compiler session up to date with
//! only the files that changed, checks resolution, syntax and semantic
//! diagnostics in that order (stopping at the first phase with an error), and
//! returns the generated code with a normalized source map.

#![warn(missing_docs)]

pub mod error;
pub mod host;
pub mod loader;

pub use error::LoaderError;
pub use host::{LoaderHost, RecordingHost};
pub use loader::{Loader, LoaderRequest, FAILURE_MESSAGE};

pub use tsload_config::{LoaderConfig, LoaderOptions};
pub use tsload_emit::{CompilationResult, SourceMap};
