//! HTTP client for the retrieval endpoint.

use std::time::{Duration, Instant};

use reqwest::header;
use serde_json::Value;
use tracing::{debug, error, info, trace};

use crate::config::KbConfig;
use crate::errors::RetrievalError;
use crate::filters::to_request_body;
use crate::probe::map_hits;
use crate::record::{KbHit, KbQuery};

/// Characters of an error body kept in [`RetrievalError::HttpStatus`].
const SNIPPET_MAX_CHARS: usize = 300;

/// Thin wrapper around a preconfigured `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct KbHttpClient {
    http: reqwest::Client,
    url_retrieve: String,
}

impl KbHttpClient {
    /// Builds the HTTP client (timeout + bearer auth) for `cfg`.
    ///
    /// # Errors
    /// Returns `RetrievalError::Config` for an unusable token and
    /// `RetrievalError::Transport` if the client cannot be built.
    pub fn new(cfg: &KbConfig) -> Result<Self, RetrievalError> {
        trace!("KbHttpClient::new kb_id={}", cfg.kb_id);

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", cfg.api_key.trim()))
                .map_err(|e| RetrievalError::Config(format!("invalid api key header: {e}")))?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .default_headers(headers)
            .build()?;

        let base = cfg.endpoint.trim().trim_end_matches('/');
        let url_retrieve = format!("{base}/knowledgebases/{}/retrieve", cfg.kb_id.trim());

        Ok(Self { http, url_retrieve })
    }

    /// Sends one retrieval request and maps the reply into hits.
    ///
    /// # Errors
    /// Transport failures, non-2xx statuses and non-JSON bodies.
    pub async fn retrieve(&self, query: &KbQuery<'_>) -> Result<Vec<KbHit>, RetrievalError> {
        let started = Instant::now();
        let body = to_request_body(query)?;

        debug!(
            top_k = query.top_k,
            mode = %query.mode,
            query_len = query.text.len(),
            "POST {}", self.url_retrieve
        );

        let resp = self.http.post(&self.url_retrieve).json(&body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let snippet: String = text.chars().take(SNIPPET_MAX_CHARS).collect();
            error!(
                %status,
                url = %self.url_retrieve,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "knowledge base returned non-success status"
            );
            return Err(RetrievalError::HttpStatus {
                status,
                url: self.url_retrieve.clone(),
                snippet,
            });
        }

        let reply: Value = serde_json::from_str(&text)?;
        let mut hits = map_hits(&reply);
        hits.truncate(query.top_k);

        info!(
            hits = hits.len(),
            latency_ms = started.elapsed().as_millis(),
            "knowledge base retrieval completed"
        );

        Ok(hits)
    }

    pub fn url(&self) -> &str {
        &self.url_retrieve
    }
}
