//! Error taxonomy for capture, serialization and baseline I/O
//!
//! A material difference between a baseline and a fresh capture is not an
//! error. It is reported as [`crate::snapshot::SnapshotOutcome::UpdatedFail`].

use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T, E = ColorizeError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ColorizeError {
    /// The tokenizer could not produce tokens for a file
    #[error("failed to capture tokens for {}: {reason}", path.display())]
    Capture { path: PathBuf, reason: String },

    /// Token JSON is malformed or missing required fields
    #[error("invalid token data in {origin}: {message}")]
    Format { origin: String, message: String },

    /// Directory or file creation/write failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fixtures directory not found: {}", .0.display())]
    MissingFixtures(PathBuf),
}

impl ColorizeError {
    pub fn capture(path: &Path, reason: impl Into<String>) -> Self {
        Self::Capture {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn format(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            origin: origin.into(),
            message: message.into(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True for errors raised by the tokenizer rather than by baseline handling
    pub fn is_capture(&self) -> bool {
        matches!(self, Self::Capture { .. })
    }
}
