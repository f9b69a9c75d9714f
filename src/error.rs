use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures of a bundling run.
///
/// Per-file read problems never show up here; they are recorded in the
/// [`SkipLedger`](crate::SkipLedger) and the walk continues.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Error during directory walk: {0}")]
    Walk(String),
    #[error("Invalid ignore pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("Invalid project type '{name}'. Available types are: {available}")]
    UnknownProjectType { name: String, available: String },
    #[error("Invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to write bundle output: {0}")]
    Output(#[source] std::io::Error),
}

impl BundleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BundleError::Io {
            path: path.into(),
            source,
        }
    }
}
