//! Typed error for the qa-pipeline crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Knowledge-base query failed.
    #[error("retrieval error: {0}")]
    Retrieval(#[from] kb_retrieval::RetrievalError),

    /// Startup wiring failed (bad LLM config, missing env, ...).
    #[error("pipeline config error: {0}")]
    Config(String),
}

impl From<llm_gateway::GatewayError> for PipelineError {
    fn from(e: llm_gateway::GatewayError) -> Self {
        Self::Config(e.to_string())
    }
}
