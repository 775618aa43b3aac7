use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{Result, validate_http_endpoint, validate_range_f64};
use crate::payload::InferenceParams;

/// Configuration for the hosted generation model.
///
/// Built once at process start (see [`crate::config::default_config`]) and
/// shared read-only afterwards.
///
/// # Fields
///
/// - `provider`: Which backend layout to use (Bedrock runtime or OpenAI-compatible).
/// - `model`: Model identifier (e.g., `"amazon.nova-pro-v1:0"`, `"gpt-4o-mini"`).
/// - `endpoint`: Base URL of the runtime endpoint.
/// - `api_key`: Bearer token for the endpoint.
/// - `max_tokens`: Upper bound on generated tokens.
/// - `temperature`: Sampling temperature (`0.0..=1.0`).
/// - `timeout_secs`: Optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use llm_gateway::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Bedrock,
///     model: "amazon.nova-pro-v1:0".to_string(),
///     endpoint: "https://bedrock-runtime.us-east-1.amazonaws.com".to_string(),
///     api_key: "token".to_string(),
///     max_tokens: 512,
///     temperature: 0.2,
///     timeout_secs: Some(60),
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The backend layout.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// Runtime base URL.
    pub endpoint: String,

    /// Bearer token sent in the `Authorization` header.
    pub api_key: String,

    /// Maximum number of tokens to generate.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f64,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Checks endpoint scheme and parameter ranges.
    ///
    /// # Errors
    /// Returns a [`crate::ConfigError`] wrapped in [`crate::GatewayError::Config`].
    pub fn validate(&self) -> Result<()> {
        validate_http_endpoint("LLM_ENDPOINT", &self.endpoint)?;
        validate_range_f64("temperature", self.temperature, 0.0, 1.0)?;
        if self.model.trim().is_empty() {
            return Err(crate::error_handler::ConfigError::EmptyModel.into());
        }
        Ok(())
    }

    /// Inference parameters carried into every request body.
    pub fn inference_params(&self) -> InferenceParams {
        InferenceParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}
