//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

use crate::errors::UploadError;

/// Where local documents come from and where they go.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    /// Object store base URL.
    pub endpoint: String,
    /// Target bucket.
    pub bucket: String,
    /// Key prefix ("folder") inside the bucket, e.g. `documents/`.
    pub prefix: String,
    /// Local directory scanned for documents (not recursive).
    pub local_dir: PathBuf,
    /// Allowed extensions, lowercase, without the dot.
    pub extensions: Vec<String>,
    /// Optional bearer token.
    pub token: Option<String>,
}

impl UploadConfig {
    /// Build from environment variables.
    ///
    /// Required: `OBJECT_STORE_ENDPOINT`, `UPLOAD_BUCKET`.
    /// Defaults: `UPLOAD_PREFIX=documents/`, `UPLOAD_DIR=spec-sheets`,
    /// `UPLOAD_EXTENSIONS=pdf,txt`.
    pub fn from_env() -> Result<Self, UploadError> {
        let cfg = Self {
            endpoint: required("OBJECT_STORE_ENDPOINT")?,
            bucket: required("UPLOAD_BUCKET")?,
            prefix: env("UPLOAD_PREFIX", "documents/"),
            local_dir: PathBuf::from(env("UPLOAD_DIR", "spec-sheets")),
            extensions: parse_extensions(&env("UPLOAD_EXTENSIONS", "pdf,txt")),
            token: std::env::var("OBJECT_STORE_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), UploadError> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(UploadError::Config(
                "OBJECT_STORE_ENDPOINT must start with http:// or https://".into(),
            ));
        }
        if self.bucket.trim().is_empty() || self.bucket.contains('/') {
            return Err(UploadError::Config(format!(
                "invalid bucket name `{}`",
                self.bucket
            )));
        }
        if self.extensions.is_empty() {
            return Err(UploadError::Config(
                "UPLOAD_EXTENSIONS must list at least one extension".into(),
            ));
        }
        Ok(())
    }

    /// Object key for a file name: prefix (slash-terminated when non-empty) + name.
    pub fn object_key(&self, file_name: &str) -> String {
        let prefix = self.prefix.trim().trim_start_matches('/');
        if prefix.is_empty() || prefix.ends_with('/') {
            format!("{prefix}{file_name}")
        } else {
            format!("{prefix}/{file_name}")
        }
    }
}

/// `"pdf, .TXT"` → `["pdf", "txt"]`.
pub fn parse_extensions(s: &str) -> Vec<String> {
    s.split(',')
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| dflt.to_string())
}

fn required(k: &'static str) -> Result<String, UploadError> {
    std::env::var(k)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| UploadError::Config(format!("missing env variable: {k}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(prefix: &str) -> UploadConfig {
        UploadConfig {
            endpoint: "https://store.example.com".into(),
            bucket: "s3-bucket-docs".into(),
            prefix: prefix.into(),
            local_dir: PathBuf::from("spec-sheets"),
            extensions: vec!["pdf".into()],
            token: None,
        }
    }

    #[test]
    fn extensions_are_normalized() {
        assert_eq!(parse_extensions("pdf, .TXT,,md "), vec!["pdf", "txt", "md"]);
    }

    #[test]
    fn object_key_joins_prefix() {
        assert_eq!(cfg("documents/").object_key("a.pdf"), "documents/a.pdf");
        assert_eq!(cfg("documents").object_key("a.pdf"), "documents/a.pdf");
        assert_eq!(cfg("").object_key("a.pdf"), "a.pdf");
    }

    #[test]
    fn bucket_must_be_plain_name() {
        let mut c = cfg("documents/");
        assert!(c.validate().is_ok());
        c.bucket = "a/b".into();
        assert!(c.validate().is_err());
    }
}
