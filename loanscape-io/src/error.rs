//! Error types for dataset loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the loan dataset
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV has no header row")]
    MissingHeader,

    #[error("CSV is missing required column: {column}")]
    MissingColumn { column: &'static str },
}

impl LoadError {
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound { path }
        } else {
            LoadError::Io { path, source }
        }
    }
}

impl From<LoadError> for loanscape_core::Error {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::Io { source, .. } => loanscape_core::Error::Io(source),
            other => loanscape_core::Error::InvalidData(other.to_string()),
        }
    }
}
