//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::LoaderConfig;
use std::path::Path;

/// Name of the configuration file inside a project directory.
pub const CONFIG_FILE: &str = "tsload.toml";

/// Loads and validates `tsload.toml` from a project directory.
///
/// Relative paths in the file (`build.root`, `compiler.default_lib`) are
/// resolved against `project_dir`.
pub fn load_config(project_dir: &Path) -> Result<LoaderConfig, ConfigError> {
    let content = std::fs::read_to_string(project_dir.join(CONFIG_FILE))?;
    let mut config = load_config_from_str(&content)?;
    if config.build.root.is_relative() {
        config.build.root = project_dir.join(&config.build.root);
    }
    if config.compiler.default_lib.is_relative() {
        config.compiler.default_lib = project_dir.join(&config.compiler.default_lib);
    }
    Ok(config)
}

/// Parses and validates a configuration from a string.
///
/// Paths are left exactly as written.
pub fn load_config_from_str(content: &str) -> Result<LoaderConfig, ConfigError> {
    let config: LoaderConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &LoaderConfig) -> Result<(), ConfigError> {
    if config.compiler.default_lib.as_os_str().is_empty() {
        return Err(ConfigError::MissingField("compiler.default_lib".to_string()));
    }
    if config.build.root.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "build.root must not be empty".to_string(),
        ));
    }
    Ok(())
}
