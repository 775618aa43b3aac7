use std::{env, sync::Arc};

mod core;
mod error_handler;
mod routes;

pub use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

use crate::routes::{
    ask::ask_question_route::ask_question, health_route::health,
    upload::upload_documents_route::upload_documents,
};

/// Builds the HTTP router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ask", post(ask_question))
        .route("/upload_documents", post(upload_documents))
        .route("/health", get(health))
        .with_state(state)
}

/// Loads state from the environment and serves until Ctrl+C.
///
/// # Errors
/// Missing `API_ADDRESS`, invalid service configuration, or bind/serve failures.
pub async fn start() -> AppResult<()> {
    let host_url = env::var("API_ADDRESS").map_err(|_| AppError::MissingEnv("API_ADDRESS"))?;
    let state = Arc::new(AppState::from_env()?);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("API stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{future::Future, pin::Pin};

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use kb_retrieval::{KbHit, KbQuery, KnowledgeBase, QueryDefaults, RetrievalError, SearchMode};
    use llm_gateway::{InferenceParams, LlmProvider, ModelInvoker};
    use qa_pipeline::{PipelineConfig, QaPipeline};
    use serde_json::Value;
    use tower::ServiceExt;

    struct StubKb {
        fail: bool,
    }

    impl KnowledgeBase for StubKb {
        fn defaults(&self) -> QueryDefaults {
            QueryDefaults {
                top_k: 3,
                mode: SearchMode::Hybrid,
                filter: None,
            }
        }

        fn retrieve<'a>(
            &'a self,
            _query: &'a KbQuery<'a>,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<KbHit>, RetrievalError>> + Send + 'a>> {
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    return Err(RetrievalError::Config("kb unreachable".into()));
                }
                Ok(vec![KbHit {
                    title: "machine_files.pdf".into(),
                    content: "Rated Power: 3.5 kW".into(),
                    source: "s3://docs/documents/machine_files.pdf".into(),
                    score: 0.8,
                }])
            })
        }
    }

    struct StubModel;

    impl ModelInvoker for StubModel {
        fn provider(&self) -> LlmProvider {
            LlmProvider::OpenAI
        }

        fn model(&self) -> &str {
            "stub"
        }

        fn invoke<'a>(
            &'a self,
            _body: &'a Value,
        ) -> Pin<Box<dyn Future<Output = llm_gateway::Result<String>> + Send + 'a>> {
            Box::pin(async {
                Ok(r#"{"choices":[{"message":{"content":"3.5 kW (machine_files.pdf)"}}]}"#.into())
            })
        }
    }

    fn app(kb_fails: bool) -> Router {
        let pipeline = QaPipeline::new(PipelineConfig {
            kb: Arc::new(StubKb { fail: kb_fails }),
            invoker: Arc::new(StubModel),
            params: InferenceParams {
                max_tokens: 256,
                temperature: 0.2,
            },
            doc_reference_path: None,
            max_ctx_chars: 8000,
        });
        router(Arc::new(AppState {
            pipeline: Arc::new(pipeline),
            upload: None,
        }))
    }

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn ask(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, json) = call(app(false), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "ok");
    }

    #[tokio::test]
    async fn ask_returns_answer_and_context() {
        let (status, json) = call(
            app(false),
            ask(r#"{"question":"What is the rated power of the XR-220?"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["answer"], "3.5 kW (machine_files.pdf)");
        assert_eq!(json["data"]["admitted"], true);
        assert_eq!(json["data"]["reason"], "OK");
        assert_eq!(json["data"]["context"][0]["title"], "machine_files.pdf");
    }

    #[tokio::test]
    async fn rejected_question_is_still_a_success_envelope() {
        let (status, json) = call(app(false), ask(r#"{"question":"Which stock should I buy?"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["admitted"], false);
        assert_eq!(
            json["data"]["answer"],
            "Request denied: I cannot give personalized investment advice."
        );
        assert_eq!(json["data"]["context"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn empty_question_is_bad_request() {
        let (status, json) = call(app(false), ask(r#"{"question":"   "}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert_eq!(json["error"]["field"]["name"], "question");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, json) = call(app(false), ask("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn retrieval_failure_maps_to_bad_gateway() {
        let (status, json) = call(app(true), ask(r#"{"question":"What is the rated power?"}"#)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "RETRIEVAL_ERROR");
    }

    #[tokio::test]
    async fn upload_without_config_is_unavailable() {
        let req = Request::builder()
            .method("POST")
            .uri("/upload_documents")
            .body(Body::empty())
            .unwrap();
        let (status, json) = call(app(false), req).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"]["code"], "UPLOAD_DISABLED");
    }
}
