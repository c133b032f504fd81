//! Mix snapshots
//!
//! A saved mixer layout (per-stem strips and master bus) as JSON. Loading
//! goes back through the mixer's setters, so out-of-range values in a
//! hand-edited file are clamped and the solo flag is recomputed.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{StemChannel, StemMixerState};
use crate::error::{Result, StudioError};

/// Snapshot format version written by this crate
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable mixer layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub master_volume: f32,
    #[serde(default)]
    pub master_muted: bool,
    #[serde(default)]
    pub master_pan: f32,
    #[serde(default)]
    pub stems: BTreeMap<String, StemChannel>,
}

impl From<&StemMixerState> for MixSnapshot {
    fn from(mixer: &StemMixerState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            master_volume: mixer.master_volume(),
            master_muted: mixer.master_muted(),
            master_pan: mixer.master_pan(),
            stems: mixer.stem_states().clone(),
        }
    }
}

impl MixSnapshot {
    /// Write this layout into `mixer`, replacing its stems
    pub fn apply_to(&self, mixer: &mut StemMixerState) {
        mixer.set_all_stem_states(self.stems.iter().map(|(id, channel)| (id.clone(), *channel)));
        mixer.set_master_volume(self.master_volume);
        mixer.set_master_muted(self.master_muted);
        mixer.set_master_pan(self.master_pan);
    }

    /// Pretty-printed JSON for this snapshot
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot, rejecting unknown versions and empty stem ids
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: MixSnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> Result<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(StudioError::InvalidSnapshot {
                reason: format!(
                    "unsupported version {} (expected {})",
                    self.version, SNAPSHOT_VERSION
                ),
            });
        }
        if let Some(id) = self.stems.keys().find(|id| id.trim().is_empty()) {
            return Err(StudioError::InvalidSnapshot {
                reason: format!("empty stem id {:?}", id),
            });
        }
        Ok(())
    }

    /// Write the snapshot to `path` as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_json()?;
        fs::write(path, content).map_err(|e| StudioError::FileWriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!("Saved mix snapshot ({} stems) to {:?}", self.stems.len(), path);
        Ok(())
    }

    /// Read and validate a snapshot file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(StudioError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|e| StudioError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }
}
