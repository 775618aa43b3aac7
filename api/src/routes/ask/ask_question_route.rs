//! POST /ask: answers a question from the knowledge base.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use qa_pipeline::AskOptions;
use tracing::{info, instrument};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::ask::ask_request::{AskRequest, AskResponse},
};

/// Handler: POST /ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"What is the rated power of the XR-220?","top_k":3}'
/// ```
#[instrument(name = "ask_route", skip_all)]
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;

    let question = body.question.trim();
    if question.is_empty() {
        return Err(AppError::InvalidField {
            field: "question",
            hint: "Provide a non-empty question.",
        });
    }

    let qa = state
        .pipeline
        .ask(question, AskOptions { top_k: body.top_k })
        .await?;
    info!(admitted = qa.verdict.admitted, hits = qa.context.len(), "question answered");

    Ok(ApiResponse::success(AskResponse::from(qa)).into_response_with_status(StatusCode::OK))
}
