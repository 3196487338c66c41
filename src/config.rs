//! Runtime configuration for an open BAM.

use crate::error::{BamError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How `save` writes the store back to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMode {
    /// Truncate the store and rewrite it in place.
    #[default]
    Truncate,
    /// Write a sibling temporary file, then rename it over the store.
    Atomic,
}

/// BAM configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BamConfig {
    /// Recall iteration ceiling (`None` = iterate until a fixed point or 2-cycle)
    pub max_iterations: Option<usize>,
    /// Persist after every add/remove
    pub autosave: bool,
    /// Store write strategy
    pub save_mode: SaveMode,
}

impl Default for BamConfig {
    fn default() -> Self {
        Self {
            max_iterations: Some(10_000),
            autosave: true,
            save_mode: SaveMode::Truncate,
        }
    }
}

impl BamConfig {
    /// No recall ceiling
    pub fn unbounded() -> Self {
        Self {
            max_iterations: None,
            ..Default::default()
        }
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| BamError::io(path, e))?;
        Ok(serde_json::from_str(&json)?)
    }
}
