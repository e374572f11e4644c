pub mod sqlite;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::StorageError;
use crate::runner::RunReport;

pub const DEFAULT_RESULTS_FILE: &str = "test_results.json";

/// Destination for the finished run. Written once, after the verdict is known.
pub trait ResultSink {
    fn write(&mut self, report: &RunReport) -> Result<(), StorageError>;
}

/// Pretty-printed JSON dump of the whole run.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for JsonFileSink {
    fn write(&mut self, report: &RunReport) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let raw = serde_json::to_string_pretty(report)?;
        fs::write(&self.path, raw).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })?;

        info!(path = %self.path.display(), "wrote detailed results");
        Ok(())
    }
}
