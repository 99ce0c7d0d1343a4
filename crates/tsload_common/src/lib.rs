//! Shared foundational types used across the tsload crates.
//!
//! Currently this is [`InternalError`], raised when one component breaks its
//! contract with another.

#![warn(missing_docs)]

pub mod result;

pub use result::InternalError;
