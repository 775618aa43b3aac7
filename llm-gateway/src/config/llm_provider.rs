use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Hosted generation backend the gateway talks to.
///
/// The provider decides both the endpoint path and the request body layout
/// (see [`crate::payload`]). It is selected once at startup from `LLM_KIND`;
/// there is no runtime guessing between providers.
///
/// # Examples
///
/// ```
/// use llm_gateway::LlmProvider;
///
/// let p: LlmProvider = "bedrock".parse().unwrap();
/// assert_eq!(p, LlmProvider::Bedrock);
/// assert!("watsonx".parse::<LlmProvider>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Bedrock-style runtime: `POST {endpoint}/model/{model}/invoke`.
    Bedrock,
    /// OpenAI-compatible chat completions: `POST {endpoint}/v1/chat/completions`.
    OpenAI,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bedrock" | "aws" | "bedrock-runtime" => Ok(LlmProvider::Bedrock),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}
