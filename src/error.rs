// Error types for the task store

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, TodoError>;

/// Everything that can go wrong while loading, mutating or saving tasks
#[derive(Error, Debug)]
pub enum TodoError {
    /// A line in the backing file could not be parsed. Fatal at load time.
    #[error("{}:{}: {}", .path.display(), .line, .reason)]
    Parse { path: PathBuf, line: usize, reason: String },

    /// User input rejected before any mutation took place
    #[error("{0}")]
    Validation(String),

    /// Position outside `1..=len`
    #[error("Invalid task number.")]
    Range { position: usize, len: usize },

    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TodoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TodoError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors the shell reports and then carries on from
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TodoError::Validation(_) | TodoError::Range { .. })
    }
}
