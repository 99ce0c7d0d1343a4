//! Turns the compiler's multi-artifact emit result into the single
//! code + source map pair the bundler expects.

#![warn(missing_docs)]

pub mod error;
pub mod extract;
pub mod source_map;

pub use error::OutputError;
pub use extract::{strip_source_map_reference, CompilationResult, OutputExtractor};
pub use source_map::SourceMap;
