//! Runtime configuration for the knowledge-base client.

use crate::errors::RetrievalError;
use crate::record::{SearchMode, SourceFilter};

/// Metadata key the hosted knowledge base stores the document URI under.
pub const DEFAULT_SOURCE_KEY: &str = "x-amz-bedrock-kb-source-uri";

/// Configuration for retrieval.
#[derive(Clone, Debug)]
pub struct KbConfig {
    /// Agent runtime base URL, e.g. `https://bedrock-agent-runtime.us-east-1.amazonaws.com`.
    pub endpoint: String,
    /// Knowledge base identifier.
    pub kb_id: String,
    /// Bearer token.
    pub api_key: String,
    /// Default number of hits per query.
    pub top_k: usize,
    /// Default search strategy.
    pub mode: SearchMode,
    /// Metadata key used by the source filter.
    pub filter_key: String,
    /// When set, restricts hits to this source value.
    pub filter_value: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl KbConfig {
    /// Creates a sane default config for a knowledge base behind `endpoint`.
    pub fn new_default(
        endpoint: impl Into<String>,
        kb_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            kb_id: kb_id.into(),
            api_key: api_key.into(),
            top_k: 3,
            mode: SearchMode::Hybrid,
            filter_key: DEFAULT_SOURCE_KEY.to_string(),
            filter_value: None,
            timeout_secs: 30,
        }
    }

    /// Loads the config from environment variables.
    ///
    /// Required: `KB_ENDPOINT`, `KB_ID`, `KB_API_KEY`.
    /// Optional: `KB_TOP_K` (3), `KB_SEARCH_MODE` (hybrid), `KB_SOURCE_FILTER_KEY`,
    /// `KB_SOURCE_FILTER_VALUE`, `KB_TIMEOUT_SECS` (30).
    ///
    /// # Errors
    /// Returns `RetrievalError::Config` for missing or malformed values.
    pub fn from_env() -> Result<Self, RetrievalError> {
        let mut cfg = Self::new_default(
            required("KB_ENDPOINT")?,
            required("KB_ID")?,
            required("KB_API_KEY")?,
        );

        if let Some(v) = optional("KB_TOP_K") {
            cfg.top_k = v
                .parse()
                .map_err(|_| RetrievalError::Config(format!("KB_TOP_K: expected integer, got `{v}`")))?;
        }
        if let Some(v) = optional("KB_SEARCH_MODE") {
            cfg.mode = v.parse()?;
        }
        if let Some(v) = optional("KB_SOURCE_FILTER_KEY") {
            cfg.filter_key = v;
        }
        cfg.filter_value = optional("KB_SOURCE_FILTER_VALUE");
        if let Some(v) = optional("KB_TIMEOUT_SECS") {
            cfg.timeout_secs = v.parse().map_err(|_| {
                RetrievalError::Config(format!("KB_TIMEOUT_SECS: expected integer, got `{v}`"))
            })?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RetrievalError> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(RetrievalError::Config(
                "endpoint must start with http:// or https://".into(),
            ));
        }
        if self.kb_id.trim().is_empty() {
            return Err(RetrievalError::Config("kb_id is empty".into()));
        }
        if self.api_key.trim().is_empty() {
            return Err(RetrievalError::Config("api_key is empty".into()));
        }
        if self.top_k == 0 {
            return Err(RetrievalError::Config("top_k must be > 0".into()));
        }
        if self.filter_key.trim().is_empty() {
            return Err(RetrievalError::Config("filter_key is empty".into()));
        }
        Ok(())
    }

    /// Source filter built from `filter_key`/`filter_value`, if configured.
    pub fn source_filter(&self) -> Option<SourceFilter> {
        self.filter_value
            .as_ref()
            .filter(|v| !v.trim().is_empty())
            .map(|v| SourceFilter {
                key: self.filter_key.clone(),
                value: v.clone(),
            })
    }
}

fn required(key: &'static str) -> Result<String, RetrievalError> {
    optional(key).ok_or_else(|| RetrievalError::Config(format!("missing env variable: {key}")))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
