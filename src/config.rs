//! Engine tuning loaded from an optional TOML file.
//!
//! Every field has a default, so a partial file only overrides what it names.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Visible node count above which the canvas switches to heavy rendering.
    pub heavy_node_threshold: usize,
    /// Visible edge count above which the canvas switches to heavy rendering.
    pub heavy_edge_threshold: usize,
    /// Direct edge count of the spotlight at which path labels are hidden.
    pub crowded_edge_threshold: usize,
    pub max_path_labels: usize,
    pub min_label_length: f32,
    pub animation_duration_ms: u64,
    pub view_margin_px: f32,
    pub reduced_motion: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            heavy_node_threshold: 90,
            heavy_edge_threshold: 180,
            crowded_edge_threshold: 10,
            max_path_labels: 4,
            min_label_length: 6.0,
            animation_duration_ms: 480,
            view_margin_px: 72.0,
            reduced_motion: false,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn animation_duration_secs(&self) -> f64 {
        self.animation_duration_ms as f64 / 1000.0
    }
}
