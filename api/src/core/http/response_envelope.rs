//! JSON envelope every route answers with.
//!
//! Success: `{"success":true,"data":…}`.
//! Failure: `{"success":false,"error":{"code":…,"message":…,"field":{"name":…,"hint":…}}}`,
//! where `field` only appears for request validation errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error_handler::AppError;

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable code clients can branch on (e.g. `RETRIEVAL_ERROR`).
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldHint>,
}

/// The request field that failed validation.
#[derive(Debug, Serialize)]
pub struct FieldHint {
    pub name: &'static str,
    pub hint: &'static str,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        let field = match err {
            AppError::InvalidField { field, hint } => Some(FieldHint { name: *field, hint: *hint }),
            _ => None,
        };
        Self {
            code: err.error_code(),
            message: err.to_string(),
            field,
        }
    }
}

impl ApiResponse<()> {
    /// Failure envelope for `err`, sent with the status the error maps to.
    pub fn from_error(err: &AppError) -> Response {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody::from(err)),
        }
        .into_response_with_status(err.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn disabled_upload_has_no_field_hint() {
        let resp = ApiResponse::<()>::from_error(&AppError::UploadDisabled);
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
        assert_eq!(json["error"]["code"], "UPLOAD_DISABLED");
        assert_eq!(json["error"]["message"], "document upload is not configured");
        assert!(json["error"].get("field").is_none());
    }

    #[tokio::test]
    async fn invalid_field_names_the_field() {
        let resp = ApiResponse::<()>::from_error(&AppError::InvalidField {
            field: "question",
            hint: "Provide a non-empty question.",
        });
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert_eq!(json["error"]["field"]["name"], "question");
        assert_eq!(json["error"]["field"]["hint"], "Provide a non-empty question.");
    }

    #[tokio::test]
    async fn success_omits_error() {
        let resp = ApiResponse::success("ok").into_response_with_status(StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "ok");
        assert!(json.get("error").is_none());
    }
}
