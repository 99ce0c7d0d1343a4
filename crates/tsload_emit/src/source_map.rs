//! Revision 3 source maps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A source map as emitted by the compiler.
///
/// Fields the loader does not touch are carried through unchanged, including
/// any keys not modelled here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    /// Format revision, normally 3.
    pub version: u32,
    /// Name of the generated file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Prefix applied to every entry of `sources`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    /// Original source paths.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Original source texts, parallel to `sources`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    /// Symbol names referenced by `mappings`.
    #[serde(default)]
    pub names: Vec<String>,
    /// VLQ-encoded mappings.
    pub mappings: String,
    /// Any other keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SourceMap {
    /// Parses a source map from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serializes to a JSON value.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Serializes to JSON text.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
