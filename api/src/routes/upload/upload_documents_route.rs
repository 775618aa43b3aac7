//! POST /upload_documents: pushes the local document folder to the bucket.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use tracing::{info, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
};

#[instrument(name = "upload_documents_route", skip_all)]
pub async fn upload_documents(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let cfg = state.upload.as_ref().ok_or(AppError::UploadDisabled)?;

    let report = doc_uploader::upload_dir(cfg).await?;
    info!(
        uploaded = report.uploaded.len(),
        skipped = report.skipped.len(),
        "documents uploaded"
    );

    Ok(ApiResponse::success(report).into_response_with_status(StatusCode::OK))
}
