use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop the harness itself. Individual probe failures never end up
/// here; they are recorded as outcomes.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("invalid base URL `{url}`")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}

/// Errors raised while writing or reading persisted run results.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to serialize run report")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write results file `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("run history database error")]
    Database(#[from] rusqlite::Error),
}

