use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options understood by `ScanLoader::load`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Decode file inputs into memory; when false only the source is recorded
    pub materialize: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { materialize: true }
    }
}

/// Pipeline run options suitable for config files.
/// `extra` is handed to the stage untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub materialize: bool,
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            materialize: true,
            extra: BTreeMap::new(),
        }
    }
}

impl PipelineOptions {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            materialize: self.materialize,
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
