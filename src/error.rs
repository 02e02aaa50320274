//! Error types for snapshot commands

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors surfaced at command level.
#[derive(Debug, Error)]
pub enum SnapcatError {
    /// Invalid option or pattern, reported before any I/O happens.
    #[error("{message}")]
    Validation { message: String },

    /// I/O failure tied to a path.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every candidate file failed, or no candidate existed at all.
    #[error("No files were successfully processed ({errors} errors)")]
    NoFilesProcessed { errors: usize },

    /// File processing ran past the configured wall-clock budget.
    #[error("File processing timeout after {}ms", .budget.as_millis())]
    Timeout { budget: Duration },

    /// Writing the formatted output failed.
    #[error("Failed to write output to {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Command-scoped wrapper, rendered as "Tree command failed: ...".
    #[error("{command} command failed: {source}")]
    Command {
        command: &'static str,
        #[source]
        source: Box<SnapcatError>,
    },
}

impl SnapcatError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap this error with the name of the command that produced it.
    pub fn in_command(self, command: &'static str) -> Self {
        Self::Command {
            command,
            source: Box::new(self),
        }
    }

    /// Whether this is (or wraps) a validation error.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation { .. } => true,
            Self::Command { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

/// Why a single file could not be inspected.
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("cannot inspect {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run deadline passed before this file was finished.
    #[error("inspection of {} cancelled", path.display())]
    Cancelled { path: PathBuf },
}

impl InspectError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

pub type Result<T> = std::result::Result<T, SnapcatError>;
