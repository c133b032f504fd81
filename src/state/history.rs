//! Mix History
//!
//! Undo/redo for mixer edits. Each entry stores complete mixer snapshots
//! before and after the edit, so restoring never has to invert an action.
//! Transport state is not recorded: undo never moves the playhead.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::engine::StemMixerState;
use crate::error::{Result, StudioError};

/// Default maximum number of undo levels to keep.
pub const DEFAULT_HISTORY_DEPTH: usize = 30;

/// A single undoable mixer edit.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    /// Unique identifier for this entry.
    pub id: String,

    /// Human-readable description of the edit.
    pub description: String,

    /// When the edit was committed.
    pub timestamp: DateTime<Utc>,

    /// Mixer state before the edit.
    pub state_before: StemMixerState,

    /// Mixer state after the edit.
    pub state_after: StemMixerState,
}

impl HistoryEntry {
    /// Create a new entry with a generated UUID.
    pub fn new(
        description: impl Into<String>,
        state_before: StemMixerState,
        state_after: StemMixerState,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description: description.into(),
            timestamp: Utc::now(),
            state_before,
            state_after,
        }
    }
}

/// Undo and redo stacks of mixer snapshots.
#[derive(Debug, Clone)]
pub struct MixHistory {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_depth: usize,
}

impl Default for MixHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl MixHistory {
    /// Create an empty history keeping at most `max_depth` undo levels.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Push a new entry onto the undo stack.
    ///
    /// Clears the redo stack (the history has diverged) and drops the oldest
    /// entries beyond `max_depth`.
    pub fn push(&mut self, entry: HistoryEntry) {
        debug!("[HISTORY] Push '{}'", entry.description);
        self.redo_stack.clear();
        self.undo_stack.push(entry);
        self.trim();
    }

    /// Record an edit only if it actually changed the mixer.
    ///
    /// Returns `true` when an entry was pushed.
    pub fn record(
        &mut self,
        description: impl Into<String>,
        before: &StemMixerState,
        after: &StemMixerState,
    ) -> bool {
        if before == after {
            return false;
        }
        self.push(HistoryEntry::new(description, before.clone(), after.clone()));
        true
    }

    /// Restore `mixer` to the state before the last edit.
    pub fn undo(&mut self, mixer: &mut StemMixerState) -> Result<HistoryEntry> {
        let entry = self.undo_stack.pop().ok_or(StudioError::NothingToUndo)?;
        debug!("[HISTORY] Undo '{}'", entry.description);

        *mixer = entry.state_before.clone();
        self.redo_stack.push(entry.clone());
        Ok(entry)
    }

    /// Re-apply the last undone edit to `mixer`.
    pub fn redo(&mut self, mixer: &mut StemMixerState) -> Result<HistoryEntry> {
        let entry = self.redo_stack.pop().ok_or(StudioError::NothingToRedo)?;
        debug!("[HISTORY] Redo '{}'", entry.description);

        *mixer = entry.state_after.clone();
        self.undo_stack.push(entry.clone());
        Ok(entry)
    }

    fn trim(&mut self) {
        if self.undo_stack.len() > self.max_depth {
            let excess = self.undo_stack.len() - self.max_depth;
            self.undo_stack.drain(..excess);
        }
    }

    /// Check if there are entries that can be undone.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if there are entries that can be redone.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of entries that can be undone.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of entries that can be redone.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Maximum number of undo levels kept.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Most recent entry that can be undone
    pub fn peek_undo(&self) -> Option<&HistoryEntry> {
        self.undo_stack.last()
    }

    /// Most recent entry that can be redone
    pub fn peek_redo(&self) -> Option<&HistoryEntry> {
        self.redo_stack.last()
    }

    /// Undo stack descriptions, most recent first
    pub fn descriptions(&self) -> Vec<&str> {
        self.undo_stack
            .iter()
            .rev()
            .map(|entry| entry.description.as_str())
            .collect()
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
