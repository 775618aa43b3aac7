//! Minimal object-store client: one `PUT` per object.

use std::time::Duration;

use tracing::{debug, error};

use crate::errors::UploadError;

/// Upload timeout; spec sheets are small but links can be slow.
const PUT_TIMEOUT: Duration = Duration::from_secs(120);

pub struct ObjectStore {
    http: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl ObjectStore {
    /// Construct a client for `endpoint`.
    pub fn new(endpoint: &str, token: Option<String>) -> Result<Self, UploadError> {
        let http = reqwest::Client::builder()
            .timeout(PUT_TIMEOUT)
            .build()
            .map_err(|e| UploadError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base: endpoint.trim().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// URL of `key` inside `bucket`.
    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.base, bucket, encode_key(key))
    }

    /// Stores `bytes` under `bucket/key`.
    ///
    /// # Errors
    /// `UploadError::Transport` on network failures, `UploadError::Rejected`
    /// on a non-2xx status.
    pub async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &'static str,
    ) -> Result<(), UploadError> {
        let url = self.object_url(bucket, key);
        debug!(%url, size = bytes.len(), content_type, "PUT object");

        let mut req = self
            .http
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(t) = &self.token {
            req = req.bearer_auth(t);
        }

        let resp = req.send().await.map_err(|source| UploadError::Transport {
            file: key.to_string(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            error!(%status, %url, "object store rejected upload");
            return Err(UploadError::Rejected {
                file: key.to_string(),
                status,
            });
        }
        Ok(())
    }
}

/// MIME type for the supported document kinds.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "txt" => "text/plain; charset=utf-8",
        "md" => "text/markdown; charset=utf-8",
        "json" => "application/json",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}

/// Percent-encodes each key segment, keeping `/` as the folder separator.
fn encode_key(key: &str) -> String {
    key.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}
