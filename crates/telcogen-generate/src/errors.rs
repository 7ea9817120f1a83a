use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("destination conflict: '{}' already exists and overwrite is not permitted", path.display())]
    DestinationConflict { path: PathBuf },
    #[error("write failure at '{}': {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("read failure at '{}': {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error("projection error: {0}")]
    Projection(String),
    #[error("integrity check failed: {0}")]
    Integrity(String),
    #[error("core error: {0}")]
    Core(telcogen_core::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<telcogen_core::Error> for GenerationError {
    fn from(err: telcogen_core::Error) -> Self {
        match err {
            telcogen_core::Error::InvalidConfiguration(message) => {
                GenerationError::InvalidConfiguration(message)
            }
            telcogen_core::Error::InvalidRecord(message) => GenerationError::InvalidRecord(message),
            other => GenerationError::Core(other),
        }
    }
}

impl GenerationError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerationError::WriteFailure {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerationError::ReadFailure {
            path: path.into(),
            source,
        }
    }
}
