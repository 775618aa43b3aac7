use std::sync::Arc;

use doc_uploader::UploadConfig;
use qa_pipeline::{PipelineConfig, QaPipeline};
use tracing::info;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers. Built once at startup.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Question-answering pipeline (knowledge base + model handles).
    pub pipeline: Arc<QaPipeline>,
    /// Batch upload settings; `None` disables `/upload_documents`.
    pub upload: Option<UploadConfig>,
}

impl AppState {
    /// Load shared state from environment variables.
    ///
    /// Upload is enabled only when `OBJECT_STORE_ENDPOINT` is set; once set,
    /// the rest of the upload config must be valid.
    pub fn from_env() -> Result<Self, AppError> {
        let pipeline = QaPipeline::new(
            PipelineConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?,
        );

        let upload = match std::env::var("OBJECT_STORE_ENDPOINT") {
            Ok(v) if !v.trim().is_empty() => Some(
                UploadConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?,
            ),
            _ => {
                info!("OBJECT_STORE_ENDPOINT not set, /upload_documents disabled");
                None
            }
        };

        Ok(Self {
            pipeline: Arc::new(pipeline),
            upload,
        })
    }
}
