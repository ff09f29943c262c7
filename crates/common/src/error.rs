//! Error types shared across CareLab crates.

use std::path::PathBuf;

/// Top-level error type for CareLab operations.
#[derive(Debug, thiserror::Error)]
pub enum CarelabError {
    #[error("Capture error: {message}")]
    Capture { message: String },

    #[error("Assembly error: {message}")]
    Assembly { message: String },

    #[error("Save error: {message}")]
    Save { message: String },

    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("An export is already in progress ({active})")]
    Busy { active: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CarelabError.
pub type CarelabResult<T> = Result<T, CarelabError>;

impl CarelabError {
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn assembly(msg: impl Into<String>) -> Self {
        Self::Assembly {
            message: msg.into(),
        }
    }

    pub fn save(msg: impl Into<String>) -> Self {
        Self::Save {
            message: msg.into(),
        }
    }

    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Whether this error came from the export gate rejecting a second export.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}
