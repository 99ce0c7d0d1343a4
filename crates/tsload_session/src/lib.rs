//! The long-lived compiler session and the boundary to the compiler engine.
//!
//! The engine itself (parsing, type checking, code generation) is opaque and
//! reached only through [`CompilerEngine`]. [`CompilationSession`] wraps one
//! engine for the lifetime of the host process and remembers, per path, which
//! version of a file the engine was last given ([`SessionRegistration`]).

#![warn(missing_docs)]

pub mod engine;
pub mod registration;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use engine::{
    ArtifactKind, CompilerEngine, EmitArtifact, EmitFailure, Resolution, ResolvedFile,
    ResolverHost,
};
pub use registration::{Registration, SessionRegistration};
pub use session::CompilationSession;
