//! Studio configuration
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! engine defaults.
//!
//! ```json
//! {
//!   "default_master_volume": 0.85,
//!   "skip_seconds": 10.0,
//!   "history_depth": 30,
//!   "stem_ids": ["vocals", "drums", "bass", "other"]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::params::{DEFAULT_MASTER_VOLUME, DEFAULT_SKIP_SECONDS};
use crate::error::{Result, StudioError};
use crate::state::{StudioStore, DEFAULT_HISTORY_DEPTH};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Master volume on start and after a mixer reset
    pub default_master_volume: f32,
    /// Step used by skip actions that carry no amount
    pub skip_seconds: f64,
    /// Maximum undo levels kept for mixer edits
    pub history_depth: usize,
    /// Stems seeded into the mixer when a store is built
    pub stem_ids: Vec<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            default_master_volume: DEFAULT_MASTER_VOLUME,
            skip_seconds: DEFAULT_SKIP_SECONDS,
            history_depth: DEFAULT_HISTORY_DEPTH,
            stem_ids: Vec::new(),
        }
    }
}

impl StudioConfig {
    /// Parse and validate a config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: StudioConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
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
        let config = Self::from_json(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load `path` if given, falling back to defaults when it is missing
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Self::default()),
            Some(path) => match Self::load(path) {
                Err(StudioError::FileNotFound { path }) => {
                    warn!("Config {:?} not found, using defaults", path);
                    Ok(Self::default())
                }
                other => other,
            },
        }
    }

    /// Check every field is within its accepted range
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.default_master_volume) {
            return Err(invalid(
                "default_master_volume",
                format!("{} is outside 0.0..=1.0", self.default_master_volume),
            ));
        }
        if !self.skip_seconds.is_finite() || self.skip_seconds <= 0.0 {
            return Err(invalid(
                "skip_seconds",
                format!("{} must be a positive number of seconds", self.skip_seconds),
            ));
        }
        if self.history_depth == 0 {
            return Err(invalid("history_depth", "must keep at least one level".into()));
        }
        if self.stem_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(invalid("stem_ids", "stem ids must not be empty".into()));
        }
        Ok(())
    }

    /// Build a studio store with these settings and the configured stems seeded
    pub fn build_store(&self) -> StudioStore {
        let mut store = StudioStore::with_settings(
            self.default_master_volume,
            self.skip_seconds,
            self.history_depth,
        );
        store.update_mixer(|mixer| mixer.initialize_stem_states(&self.stem_ids));
        store
    }
}

fn invalid(field: &str, reason: String) -> StudioError {
    StudioError::InvalidConfig {
        field: field.to_string(),
        reason,
    }
}
