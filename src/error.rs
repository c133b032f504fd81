//! Error handling for the studio crate
//!
//! The playback and mixer engines never fail; these errors come from the
//! surrounding layer (config files, mix snapshots, session replay, history).

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for studio operations
pub type Result<T> = std::result::Result<T, StudioError>;

/// Main error type for studio operations
#[derive(Error, Debug)]
pub enum StudioError {
    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration Errors
    #[error("Invalid config value for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    // Session Errors
    #[error("Invalid mix snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    #[error("Session replay failed at action {index}: {reason}")]
    ReplayError { index: usize, reason: String },

    // History Errors
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StudioError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            StudioError::FileNotFound { .. } => "FILE_NOT_FOUND",
            StudioError::FileReadError { .. } => "FILE_READ_ERROR",
            StudioError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            StudioError::InvalidConfig { .. } => "INVALID_CONFIG",
            StudioError::InvalidSnapshot { .. } => "INVALID_SNAPSHOT",
            StudioError::ReplayError { .. } => "REPLAY_ERROR",
            StudioError::NothingToUndo => "NOTHING_TO_UNDO",
            StudioError::NothingToRedo => "NOTHING_TO_REDO",
            StudioError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors leave the stores untouched, so the caller can keep
    /// working with the current state.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StudioError::FileNotFound { .. }
                | StudioError::InvalidConfig { .. }
                | StudioError::InvalidSnapshot { .. }
                | StudioError::NothingToUndo
                | StudioError::NothingToRedo
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            StudioError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Run without --config to use the built-in defaults",
            ],
            StudioError::InvalidConfig { .. } => vec![
                "Volumes must be between 0.0 and 1.0",
                "Skip amount must be a positive number of seconds",
            ],
            StudioError::InvalidSnapshot { .. } | StudioError::Serialization(_) => vec![
                "The file may have been edited by hand - re-export it from the studio",
            ],
            StudioError::ReplayError { .. } => vec![
                "Check the action list is a JSON array of studio actions",
            ],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = StudioError::FileNotFound {
            path: PathBuf::from("studio.json"),
        };
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
        assert_eq!(StudioError::NothingToUndo.error_code(), "NOTHING_TO_UNDO");
    }

    #[test]
    fn test_recovery_suggestions() {
        let err = StudioError::InvalidConfig {
            field: "default_master_volume".to_string(),
            reason: "must be within [0, 1]".to_string(),
        };
        assert!(!err.recovery_suggestions().is_empty());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_file_errors_not_recoverable() {
        let err = StudioError::FileWriteError {
            path: PathBuf::from("mix.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert!(!err.is_recoverable());
        assert_eq!(err.error_code(), "FILE_WRITE_ERROR");
    }

    #[test]
    fn test_error_display() {
        let err = StudioError::ReplayError {
            index: 3,
            reason: "unknown action".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Session replay failed at action 3: unknown action"
        );
    }
}
