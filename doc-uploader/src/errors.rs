//! Typed error for the uploader crate.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    /// Invalid or missing configuration.
    #[error("upload config error: {0}")]
    Config(String),

    /// Local directory or file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP/transport errors when talking to the object store.
    #[error("failed to upload {file}: {source}")]
    Transport {
        file: String,
        #[source]
        source: reqwest::Error,
    },

    /// Object store rejected the upload.
    #[error("object store rejected {file} with HTTP {status}")]
    Rejected { file: String, status: StatusCode },
}
