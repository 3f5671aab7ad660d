//! Parser settings.

use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

/// Settings for binding resource paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ODataUriParserSettings {
    /// Match identifiers ignoring ASCII case when no exact match exists
    pub enable_case_insensitive: bool,
    /// Allow bound operations to be called without their namespace
    pub enable_unqualified_operation_call: bool,
    /// Longest accepted path, in segments
    pub max_segments: usize,
}

impl Default for ODataUriParserSettings {
    fn default() -> Self {
        Self {
            enable_case_insensitive: false,
            enable_unqualified_operation_call: false,
            max_segments: 100,
        }
    }
}

impl ODataUriParserSettings {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read parser settings {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("failed to parse parser settings {}", path.display()))
    }
}
