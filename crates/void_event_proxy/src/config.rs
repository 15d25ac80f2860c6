//! Rename proxy tables
//!
//! Declares shorthand renames for a component in TOML:
//!
//! ```toml
//! [[rename]]
//! source = "uiSaveClicked"
//! target = "dataSaveRequested"
//!
//! [[rename]]
//! source = "uiCancelClicked"
//! target = "dataCancelRequested"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ProxyError, ProxyResult};

/// One shorthand rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRule {
    /// Event type listened for
    pub source: String,
    /// Event type re-published
    pub target: String,
}

/// A set of rename rules for one component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyTable {
    /// Rules, written as `[[rename]]` tables
    #[serde(default, rename = "rename")]
    pub renames: Vec<RenameRule>,
}

impl ProxyTable {
    /// Parse a table from TOML
    pub fn from_toml_str(contents: &str) -> ProxyResult<Self> {
        toml::from_str(contents).map_err(|e| ProxyError::Config(e.to_string()))
    }

    /// Load a table from a TOML file
    pub fn load(path: impl AsRef<Path>) -> ProxyResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ProxyError::Config(format!("{}: {}", path.display(), e)))?;
        let table = Self::from_toml_str(&contents)?;
        log::info!("Loaded {} rename rules from {}", table.renames.len(), path.display());
        Ok(table)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> ProxyResult<String> {
        toml::to_string(self).map_err(|e| ProxyError::Config(e.to_string()))
    }

    /// Add a rule
    pub fn with_rename(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.renames.push(RenameRule {
            source: source.into(),
            target: target.into(),
        });
        self
    }
}
