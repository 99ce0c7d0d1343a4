//! Loader configuration: the `tsload.toml` project file and the per-invocation
//! options the bundler passes in its loader query string.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod options;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use options::LoaderOptions;
pub use types::*;
