//! Generation model config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `LLM_KIND`        = provider kind (`bedrock` or `openai`, mandatory)
//! - `LLM_ENDPOINT`    = runtime base URL (mandatory)
//! - `LLM_MODEL`       = model identifier (mandatory)
//! - `LLM_API_KEY`     = bearer token (mandatory)
//! - `LLM_MAX_TOKENS`  = optional max tokens (u32, default 512)
//! - `LLM_TEMPERATURE` = optional temperature (f64 in 0.0..=1.0, default 0.2)
//! - `LLM_TIMEOUT_SECS`= optional request timeout (u64, default 60)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{Result, env_opt_f64, env_opt_u32, env_opt_u64, must_env},
};

/// Default generation budget when `LLM_MAX_TOKENS` is unset.
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// Default sampling temperature; low to keep answers close to the documents.
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Builds and validates the generation config from the environment.
///
/// The provider is chosen explicitly from `LLM_KIND`; an unknown value is a
/// startup error rather than a silent fallback.
///
/// # Errors
/// - [`crate::ConfigError::MissingVar`] for absent mandatory variables
/// - [`crate::ConfigError::UnsupportedProvider`] for an unknown `LLM_KIND`
/// - [`crate::ConfigError::InvalidNumber`] / [`crate::ConfigError::OutOfRange`] for bad numbers
/// - [`crate::ConfigError::InvalidFormat`] for a non-HTTP endpoint
pub fn config_from_env() -> Result<LlmModelConfig> {
    let provider: LlmProvider = must_env("LLM_KIND")?.parse()?;
    let endpoint = must_env("LLM_ENDPOINT")?;
    let model = must_env("LLM_MODEL")?;
    let api_key = must_env("LLM_API_KEY")?;

    let cfg = LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS),
        temperature: env_opt_f64("LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE),
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    };
    cfg.validate()?;
    Ok(cfg)
}
