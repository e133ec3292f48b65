//! Engine configuration
//!
//! Handles loading of the optional `dtable.yaml` file that tunes the
//! engine's sentinels. Every field has a default, so an empty file (or
//! no file at all) yields the stock behavior.

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up by [`EngineConfig::load_from_dir`]
pub const CONFIG_FILE: &str = "dtable.yaml";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EngineConfig {
    /// Names that mark the output column (trimmed, case-insensitive)
    #[serde(default = "default_output_names")]
    pub output_column_names: Vec<String>,

    /// Cell value that matches any input during evaluation
    #[serde(default = "default_wildcard")]
    pub wildcard: String,

    /// Result text reported when no row matches
    #[serde(default = "default_no_match_text")]
    pub no_match_text: String,

    /// Prefix for synthesized column names: `{prefix} {n}`
    #[serde(default = "default_column_prefix")]
    pub new_column_prefix: String,
}

fn default_output_names() -> Vec<String> {
    vec!["result".into(), "output".into(), "decision".into()]
}

fn default_wildcard() -> String {
    "-".to_string()
}

fn default_no_match_text() -> String {
    "No match found".to_string()
}

fn default_column_prefix() -> String {
    "Condition".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            output_column_names: default_output_names(),
            wildcard: default_wildcard(),
            no_match_text: default_no_match_text(),
            new_column_prefix: default_column_prefix(),
        }
    }
}

impl EngineConfig {
    /// Parse configuration from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_norway::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", CONFIG_FILE, e)))
    }

    /// Load configuration from a file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::from_yaml(&content)
    }

    /// Load `dtable.yaml` from a directory, if present
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_file = dir.join(CONFIG_FILE);
        if !config_file.exists() {
            return Ok(None);
        }
        Self::load_from_file(&config_file).map(Some)
    }

    /// Whether `name` marks the output column
    pub fn is_output_name(&self, name: &str) -> bool {
        let name = name.trim().to_lowercase();
        self.output_column_names
            .iter()
            .any(|candidate| candidate.trim().to_lowercase() == name)
    }

    /// Check the configuration for values the engine cannot work with
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.output_column_names.iter().all(|n| n.trim().is_empty()) {
            errors.push("At least one output column name is required".into());
        }

        if self.wildcard.is_empty() {
            errors.push("Wildcard must not be empty".into());
        }

        if self.no_match_text.is_empty() {
            errors.push("No-match text must not be empty".into());
        }

        if self.new_column_prefix.trim().is_empty() {
            errors.push("New column prefix must not be empty".into());
        }

        if self.is_output_name(&self.wildcard) {
            errors.push(format!(
                "Wildcard '{}' collides with an output column name",
                self.wildcard
            ));
        }

        errors
    }
}
