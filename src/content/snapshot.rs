use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::graph::NodeKind;

/// What a deep link or a restart needs to restore the same view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    #[serde(default)]
    pub selected_id: Option<String>,
    #[serde(default)]
    pub kind_filter: Option<NodeKind>,
    #[serde(default)]
    pub only_related: bool,
}

pub trait SnapshotStore: Send {
    fn load(&self) -> Result<Option<SelectionSnapshot>>;
    fn save(&self, snapshot: &SelectionSnapshot) -> Result<()>;
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<SelectionSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read snapshot from {}", self.path.display()))?;
        let snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse snapshot from {}", self.path.display()))?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &SelectionSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let raw = serde_json::to_string_pretty(snapshot).context("failed to serialize snapshot")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write snapshot to {}", self.path.display()))
    }
}
