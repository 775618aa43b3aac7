//! Gateway to a hosted generation model.
//!
//! The crate shapes generation requests (a segment-list primary body and a
//! single-string fallback body), sends them through a [`ModelInvoker`], and
//! turns whatever the service replies with into plain text via
//! [`normalizer::extract_text`].
//!
//! Public entry points:
//! - [`generation::generate`]: never fails, embeds both causes on double failure.
//! - [`generation::try_generate`]: same flow with a typed error.
//! - [`services::invoke_service::InvokeService`]: HTTP invoker for Bedrock/OpenAI-style endpoints.

pub mod config;
pub mod error_handler;
pub mod generation;
pub mod normalizer;
pub mod payload;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{ConfigError, GatewayError, Result};
pub use generation::{ModelInvoker, generate, try_generate};
pub use normalizer::extract_text;
pub use payload::{GenerationRequest, InferenceParams, UserMessage};
