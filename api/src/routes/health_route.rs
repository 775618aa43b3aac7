use axum::{http::StatusCode, response::Response};

use crate::core::http::response_envelope::ApiResponse;

/// Handler: GET /health
pub async fn health() -> Response {
    ApiResponse::success("ok").into_response_with_status(StatusCode::OK)
}
