//! Runtime configuration loaded from environment variables.

use std::{fmt, sync::Arc};

use kb_retrieval::{KbConfig, KnowledgeBase, KnowledgeBaseClient};
use llm_gateway::{
    InferenceParams, ModelInvoker, config::default_config::config_from_env,
    services::invoke_service::InvokeService,
};
use tracing::info;

use crate::error::PipelineError;

/// Default byte budget for the knowledge-base context block.
pub const DEFAULT_MAX_CTX_CHARS: usize = 8000;

/// Everything a [`crate::QaPipeline`] needs. Built once at startup, never mutated.
#[derive(Clone)]
pub struct PipelineConfig {
    pub kb: Arc<dyn KnowledgeBase>,
    pub invoker: Arc<dyn ModelInvoker>,
    pub params: InferenceParams,
    /// Optional document path sent as an extra segment (`DOC_REFERENCE_PATH`).
    pub doc_reference_path: Option<String>,
    /// Context block budget (`MAX_CTX_CHARS`).
    pub max_ctx_chars: usize,
}

impl PipelineConfig {
    /// Builds the knowledge-base client and the model invoker from the environment.
    ///
    /// # Errors
    /// `PipelineError::Retrieval` / `PipelineError::Config` when either handle
    /// cannot be constructed.
    pub fn from_env() -> Result<Self, PipelineError> {
        let kb = KnowledgeBaseClient::new(KbConfig::from_env()?)?;

        let llm_cfg = config_from_env()?;
        let params = llm_cfg.inference_params();
        let invoker = InvokeService::new(llm_cfg)?;

        let cfg = Self {
            kb: Arc::new(kb),
            invoker: Arc::new(invoker),
            params,
            doc_reference_path: std::env::var("DOC_REFERENCE_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            max_ctx_chars: parse("MAX_CTX_CHARS", DEFAULT_MAX_CTX_CHARS),
        };
        info!(
            model = %cfg.invoker.model(),
            provider = ?cfg.invoker.provider(),
            max_ctx_chars = cfg.max_ctx_chars,
            "pipeline configured"
        );
        Ok(cfg)
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("model", &self.invoker.model())
            .field("params", &self.params)
            .field("doc_reference_path", &self.doc_reference_path)
            .field("max_ctx_chars", &self.max_ctx_chars)
            .finish_non_exhaustive()
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}
