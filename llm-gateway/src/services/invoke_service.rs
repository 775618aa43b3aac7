//! HTTP transport for the hosted generation model.
//!
//! Minimal, non-streaming client. Endpoints are derived from
//! `LlmModelConfig::endpoint` and the provider:
//! - Bedrock: POST {endpoint}/model/{model}/invoke
//! - OpenAI:  POST {endpoint}/v1/chat/completions
//!
//! Constructor validation:
//! - `cfg.api_key` must be non-empty
//! - `cfg.endpoint` must start with http:// or https://
//!
//! The service returns raw reply text; callers decide how to read it (see
//! [`crate::normalizer`]).

use std::{future::Future, pin::Pin, time::Duration, time::Instant};

use reqwest::header;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{ConfigError, GatewayError, Result, make_snippet},
    generation::ModelInvoker,
};

/// Default timeout when the config does not set one.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Thin client for the generation endpoint.
///
/// Constructed once from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers).
#[derive(Debug)]
pub struct InvokeService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_invoke: String,
}

impl InvokeService {
    /// Creates a new [`InvokeService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::MissingVar`] if `cfg.api_key` is empty
    /// - [`ConfigError::InvalidFormat`] if `cfg.endpoint` is not HTTP(S)
    /// - [`GatewayError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        cfg.validate()?;

        if cfg.api_key.trim().is_empty() {
            return Err(ConfigError::MissingVar("LLM_API_KEY").into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", cfg.api_key.trim())).map_err(
                |_| ConfigError::InvalidFormat {
                    var: "LLM_API_KEY",
                    reason: "not a valid header value",
                },
            )?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_invoke = invoke_url(cfg.provider, &cfg.endpoint, &cfg.model);

        info!(
            provider = ?cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "InvokeService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_invoke,
        })
    }

    /// Config this service was built from.
    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }

    /// Sends one JSON body and returns the reply text.
    ///
    /// # Errors
    /// - [`GatewayError::HttpStatus`] for non-2xx responses
    /// - [`GatewayError::Timeout`] when the request exceeds the client timeout
    /// - [`GatewayError::HttpTransport`] for other client/network failures
    pub async fn send(&self, body: &Value) -> Result<String> {
        let started = Instant::now();

        debug!(model = %self.cfg.model, "POST {}", self.url_invoke);

        let resp = match self.client.post(&self.url_invoke).json(body).send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                let limit = self
                    .cfg
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_TIMEOUT);
                return Err(GatewayError::Timeout(limit));
            }
            Err(e) => return Err(e.into()),
        };

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let snippet = make_snippet(&text);
            error!(
                %status,
                url = %self.url_invoke,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "model invocation returned non-success status"
            );
            return Err(GatewayError::HttpStatus {
                status,
                url: self.url_invoke.clone(),
                snippet,
            });
        }

        debug!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            reply_len = text.len(),
            "model invocation completed"
        );

        Ok(text)
    }
}

impl ModelInvoker for InvokeService {
    fn provider(&self) -> LlmProvider {
        self.cfg.provider
    }

    fn model(&self) -> &str {
        &self.cfg.model
    }

    fn invoke<'a>(
        &'a self,
        body: &'a Value,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(self.send(body))
    }
}

/// Builds the invocation URL for a provider.
fn invoke_url(provider: LlmProvider, endpoint: &str, model: &str) -> String {
    let base = endpoint.trim().trim_end_matches('/');
    match provider {
        LlmProvider::Bedrock => format!("{base}/model/{}/invoke", urlencoding::encode(model)),
        LlmProvider::OpenAI => format!("{base}/v1/chat/completions"),
    }
}
