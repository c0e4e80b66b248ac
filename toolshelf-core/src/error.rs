//! Error types shared by the toolshelf core

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading toolkit sources or producing artifacts
#[derive(Error, Debug)]
pub enum ToolshelfError {
    /// A toolkit directory, manifest or catalog file is absent
    #[error("{0}")]
    NotFound(String),

    /// A manifest is missing or structurally invalid where one is required
    #[error("Configuration error: {0}")]
    Config(String),

    /// The string is not a valid toolkit slug
    #[error("Invalid slug '{0}': expected lowercase letters, numbers, hyphens, or underscores")]
    InvalidSlug(String),

    #[error("I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl ToolshelfError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ToolshelfError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ToolshelfError::Json {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means "the thing asked for does not exist"
    pub fn is_not_found(&self) -> bool {
        matches!(self, ToolshelfError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, ToolshelfError>;
