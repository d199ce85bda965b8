//! Unrecoverable failures. Anything per-member or per-reference is reported
//! through [`crate::diagnostics`] instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SetupError>;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid XML documentation: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("malformed documentation file: {0}")]
    Malformed(String),

    #[error("invalid metadata manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("invalid site configuration: {0}")]
    SiteConfig(#[from] serde_yaml::Error),

    #[error("unusable site configuration: {0}")]
    SiteLayout(String),
}

impl SetupError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SetupError::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SetupError::Write {
            path: path.into(),
            source,
        }
    }
}
