//! JSON persistence for memory states and study progress.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::manager::MemoryManager;
use crate::statistics::StudyProgress;

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Everything lexirep persists between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: String,
    /// When the snapshot was last written.
    #[serde(alias = "savedAt")]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub memory: MemoryManager,
    #[serde(default)]
    pub progress: StudyProgress,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            exported_at: None,
            memory: MemoryManager::default(),
            progress: StudyProgress::default(),
        }
    }
}

impl Snapshot {
    /// Save the snapshot as JSON to a file, stamping it with `now`.
    pub fn save_json(&mut self, path: &Path, now: DateTime<Utc>) -> Result<()> {
        self.exported_at = Some(now);
        let json = serde_json::to_string_pretty(self).context("failed to serialize snapshot")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write state to {}", path.display()))?;
        tracing::info!(items = self.memory.len(), "saved state to {}", path.display());
        Ok(())
    }

    /// Load a snapshot from a JSON file.
    ///
    /// Every memory record is validated while decoding, so a snapshot that
    /// loads is safe to hand to the scheduler.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read state from {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse state JSON: {}", path.display()))?;
        tracing::info!(items = snapshot.memory.len(), "loaded state from {}", path.display());
        Ok(snapshot)
    }

    /// Load a snapshot, or start empty when the file does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_json(path)
        } else {
            tracing::debug!("no state at {}, starting fresh", path.display());
            Ok(Self::default())
        }
    }
}
