use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use doc_uploader::UploadError;
use qa_pipeline::PipelineError;
use thiserror::Error;
use tracing::error;

use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    // --- IO / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid field `{field}`")]
    InvalidField {
        field: &'static str,
        hint: &'static str,
    },

    // --- Upstream services ---
    #[error("knowledge base query failed: {0}")]
    Retrieval(String),

    #[error("document upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("document upload is not configured")]
    UploadDisabled,
}

impl AppError {
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::InvalidField { .. } => StatusCode::BAD_REQUEST,

            AppError::Retrieval(_) | AppError::Upload(_) => StatusCode::BAD_GATEWAY,
            AppError::UploadDisabled => StatusCode::SERVICE_UNAVAILABLE,

            // startup-only
            AppError::MissingEnv(_)
            | AppError::Config(_)
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "MISSING_ENV",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) | AppError::InvalidField { .. } => "BAD_REQUEST",
            AppError::Retrieval(_) => "RETRIEVAL_ERROR",
            AppError::Upload(_) => "UPLOAD_ERROR",
            AppError::UploadDisabled => "UPLOAD_DISABLED",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status_code().is_server_error() {
            error!(code = self.error_code(), error = %self, "request failed");
        }
        ApiResponse::<()>::from_error(&self)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Retrieval(e) => AppError::Retrieval(e.to_string()),
            PipelineError::Config(msg) => AppError::Config(msg),
        }
    }
}
