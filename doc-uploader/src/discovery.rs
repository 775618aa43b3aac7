//! Finds the local documents eligible for upload.

use std::path::{Path, PathBuf};

use tokio::fs;

use tracing::{debug, trace};

use crate::errors::UploadError;

/// Files selected for upload plus the names that were filtered out.
#[derive(Debug, Default)]
pub struct Discovered {
    pub files: Vec<PathBuf>,
    pub skipped: Vec<String>,
}

/// Lists regular files directly inside `dir` whose extension is allowed.
///
/// Matching is case-insensitive; `extensions` are expected lowercase without
/// the dot. Results are sorted by file name.
pub async fn collect_uploads(
    dir: impl AsRef<Path>,
    extensions: &[String],
) -> Result<Discovered, UploadError> {
    let dir = dir.as_ref();
    trace!("discovery::collect_uploads dir={:?}", dir);

    let io_err = |source| UploadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut out = Discovered::default();
    let mut entries = fs::read_dir(dir).await.map_err(io_err)?;
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        if !entry.file_type().await.map_err(io_err)?.is_file() {
            continue;
        }
        let path = entry.path();
        let allowed = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false);

        if allowed {
            out.files.push(path);
        } else {
            out.skipped
                .push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    out.files.sort();
    out.skipped.sort();
    debug!(
        "discovery::collect_uploads selected={} skipped={}",
        out.files.len(),
        out.skipped.len()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn filters_by_extension_and_skips_dirs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.TXT", "notes.docx", "README"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let found = collect_uploads(dir.path(), &["pdf".into(), "txt".into()])
            .await
            .unwrap();

        let names: Vec<_> = found
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.TXT", "b.pdf"]);
        assert_eq!(found.skipped, vec!["README", "notes.docx"]);
    }

    #[tokio::test]
    async fn missing_dir_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_uploads(dir.path().join("absent"), &["pdf".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Io { .. }));
    }
}
