use std::path::PathBuf;

use thiserror::Error;

/// Every stage failure is fatal for the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to fetch {url}: {msg}")]
    Fetch { url: String, msg: String },

    #[error("unexpected document structure: {msg}")]
    Parse { msg: String },

    #[error("failed to write {}: {msg}", .path.display())]
    Write { path: PathBuf, msg: String },

    #[error("invalid configuration: {msg}")]
    Config { msg: String },
}

impl PipelineError {
    pub fn write(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        PipelineError::Write {
            path: path.into(),
            msg: err.to_string(),
        }
    }
}
