use std::path::PathBuf;

use gremlins_core::GremlinError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("gremlin error: {0}")]
    Gremlin(#[from] GremlinError),

    #[error("required path does not exist: {path}")]
    MissingPath { path: PathBuf },
}

impl HarnessError {
    /// Process exit code: 2 for a missing input path, 3 when the document
    /// rejects a gremlin operation, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingPath { .. } => 2,
            Self::Gremlin(_) => 3,
            Self::Io(_) | Self::Json(_) => 1,
        }
    }
}
