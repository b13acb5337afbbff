//! Adapter-level failures, folded into `RepositoryError` at the port

use std::path::PathBuf;

use directive_domain::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed store file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Corrupt store file {}: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },
}

impl From<AdapterError> for RepositoryError {
    fn from(err: AdapterError) -> Self {
        RepositoryError::persistence(err.to_string())
    }
}
