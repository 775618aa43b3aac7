//! Batch upload of local documents into the bucket the knowledge base ingests from.
//!
//! Public API: [`upload_dir`]. It lists the configured directory, keeps files
//! with an allowed extension, and `PUT`s each one under `prefix + file name`.
//! The first failure stops the batch.

mod config;
mod discovery;
mod errors;
mod store;

pub use config::{UploadConfig, parse_extensions};
pub use discovery::{Discovered, collect_uploads};
pub use errors::UploadError;
pub use store::{ObjectStore, content_type_for};

use serde::Serialize;
use tracing::info;

/// Outcome of a batch upload.
#[derive(Clone, Debug, Default, Serialize)]
pub struct UploadReport {
    /// Object keys written, in upload order.
    pub uploaded: Vec<String>,
    /// Local file names ignored because of their extension.
    pub skipped: Vec<String>,
}

/// Upload every eligible file from `cfg.local_dir`.
///
/// # Errors
/// Stops at the first unreadable file or rejected upload; the error names the file.
pub async fn upload_dir(cfg: &UploadConfig) -> Result<UploadReport, UploadError> {
    let found = collect_uploads(&cfg.local_dir, &cfg.extensions).await?;
    let store = ObjectStore::new(&cfg.endpoint, cfg.token.clone())?;

    let mut report = UploadReport {
        uploaded: Vec::with_capacity(found.files.len()),
        skipped: found.skipped,
    };

    for path in found.files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let key = cfg.object_key(&file_name);

        info!(file = %file_name, key = %key, "uploading");

        let bytes = tokio::fs::read(&path).await.map_err(|source| UploadError::Io {
            path: path.clone(),
            source,
        })?;
        store
            .put(&cfg.bucket, &key, bytes, content_type_for(&file_name))
            .await?;

        report.uploaded.push(key);
    }

    info!(
        uploaded = report.uploaded.len(),
        skipped = report.skipped.len(),
        bucket = %cfg.bucket,
        "upload completed"
    );
    Ok(report)
}
