//! Two-attempt generation: segment-list body first, single-string body second.
//!
//! Both attempts go through a [`ModelInvoker`], so the flow can run against
//! the HTTP [`crate::services::invoke_service::InvokeService`] or any other
//! transport. The reply of the attempt that succeeds is passed through
//! [`crate::normalizer::extract_text`].

use std::{future::Future, pin::Pin, time::Instant};

use serde_json::Value;
use tracing::{info, warn};

use crate::{
    config::llm_provider::LlmProvider,
    error_handler::{GatewayError, Result},
    normalizer::extract_text,
    payload::{BodyShape, GenerationRequest, build_body},
};

/// Transport that sends one request body to the hosted model.
///
/// Implementations return the raw reply text; shape handling happens in the
/// caller. Any `Err` counts as a failed attempt.
pub trait ModelInvoker: Send + Sync {
    /// Provider layout expected by this transport.
    fn provider(&self) -> LlmProvider;

    /// Model identifier placed in the body when the provider needs it.
    fn model(&self) -> &str;

    /// Sends `body` and returns the raw reply text.
    fn invoke<'a>(
        &'a self,
        body: &'a Value,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}

/// Runs the primary shape, then the fallback shape, and extracts reply text.
///
/// # Errors
/// Returns [`GatewayError::BothAttemptsFailed`] carrying both causes when
/// neither shape is accepted.
pub async fn try_generate(invoker: &dyn ModelInvoker, req: &GenerationRequest) -> Result<String> {
    let started = Instant::now();

    let primary = match attempt(invoker, req, BodyShape::Segments).await {
        Ok(text) => {
            info!(
                model = %invoker.model(),
                shape = BodyShape::Segments.label(),
                latency_ms = started.elapsed().as_millis(),
                "generation completed"
            );
            return Ok(text);
        }
        Err(e) => e,
    };

    warn!(
        model = %invoker.model(),
        error = %primary,
        "primary request shape failed, retrying with single-string body"
    );

    match attempt(invoker, req, BodyShape::SingleString).await {
        Ok(text) => {
            info!(
                model = %invoker.model(),
                shape = BodyShape::SingleString.label(),
                latency_ms = started.elapsed().as_millis(),
                "generation completed on fallback"
            );
            Ok(text)
        }
        Err(fallback) => Err(GatewayError::BothAttemptsFailed {
            primary: Box::new(primary),
            fallback: Box::new(fallback),
        }),
    }
}

/// Like [`try_generate`] but always returns displayable text.
///
/// On double failure the text is
/// `"[ERROR] primary attempt failed: … -- fallback attempt failed: …"`.
pub async fn generate(invoker: &dyn ModelInvoker, req: &GenerationRequest) -> String {
    match try_generate(invoker, req).await {
        Ok(text) => text,
        Err(e) => {
            warn!(model = %invoker.model(), error = %e, "generation failed");
            e.to_string()
        }
    }
}

async fn attempt(
    invoker: &dyn ModelInvoker,
    req: &GenerationRequest,
    shape: BodyShape,
) -> Result<String> {
    let body = build_body(invoker.provider(), invoker.model(), req, shape)?;
    let raw = invoker.invoke(&body).await?;
    Ok(extract_text(&raw))
}
