use std::fs;
use std::path::PathBuf;

use crate::error::PipelineError;

pub mod csv;
pub mod files;
pub mod http;

pub trait Source {
    /// Location used in log lines and error messages.
    fn describe(&self) -> String;

    fn fetch(&self) -> Result<String, PipelineError>;
}

pub struct FileSource {
    pub path: PathBuf,
}

impl Source for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String, PipelineError> {
        let body = fs::read_to_string(&self.path).map_err(|e| PipelineError::Fetch {
            url: self.describe(),
            msg: e.to_string(),
        })?;
        if body.trim().is_empty() {
            return Err(PipelineError::Fetch {
                url: self.describe(),
                msg: "file is empty".to_string(),
            });
        }
        Ok(body)
    }
}
