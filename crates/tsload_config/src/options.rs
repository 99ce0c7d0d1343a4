//! Per-invocation options carried in the bundler's loader query string.

use crate::error::ConfigError;

/// Options for a single loader invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// When `false`, every file touched by the invocation is re-read and
    /// re-registered regardless of cached state.
    pub cache: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self { cache: true }
    }
}

impl LoaderOptions {
    /// Parses a loader query such as `?cache=false`, `cache=false&x=1`, or a
    /// JSON object `?{"cache":false}`.
    ///
    /// Caching is disabled only by the value `false` (string or JSON
    /// boolean). Unknown keys are ignored. An empty query yields the defaults.
    pub fn from_query(query: &str) -> Result<Self, ConfigError> {
        let query = query.trim().trim_start_matches('?');
        if query.is_empty() {
            return Ok(Self::default());
        }
        if query.starts_with('{') {
            return Self::from_json(query);
        }

        let mut options = Self::default();
        for pair in query.split(['&', ',']) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key.trim() == "cache" {
                options.cache = value.trim() != "false";
            }
        }
        Ok(options)
    }

    fn from_json(query: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value =
            serde_json::from_str(query).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        let object = value.as_object().ok_or_else(|| {
            ConfigError::ParseError("loader query must be a JSON object".to_string())
        })?;
        let disabled = match object.get("cache") {
            Some(serde_json::Value::Bool(b)) => !b,
            Some(serde_json::Value::String(s)) => s == "false",
            _ => false,
        };
        Ok(Self { cache: !disabled })
    }
}
