//! Request shaping for the hosted generation model.
//!
//! A [`GenerationRequest`] is provider-agnostic. [`build_body`] renders it in
//! one of two [`BodyShape`]s:
//! - [`BodyShape::Segments`]: user content is a list of text-only parts.
//! - [`BodyShape::SingleString`]: user content is one string with the system
//!   instruction folded in. Some endpoints only accept this layout.

use serde::Serialize;
use serde_json::Value;

use crate::{
    config::llm_provider::LlmProvider,
    error_handler::{GatewayError, Result},
};

/// Separator between user segments when they are joined into one string.
const SEGMENT_SEPARATOR: &str = "\n\n";

/// Label used for the attachment segment.
const ATTACHMENT_LABEL: &str = "Local document path (for reference): ";

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceParams {
    pub max_tokens: u32,
    pub temperature: f64,
}

/// User turn: either one string or an ordered list of text-only segments.
#[derive(Debug, Clone, PartialEq)]
pub enum UserMessage {
    Text(String),
    Segments(Vec<String>),
}

/// Provider-agnostic generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// System instruction.
    pub system: String,
    /// User turn.
    pub user: UserMessage,
    /// Optional reference to a document, sent as an extra text segment.
    pub attachment: Option<String>,
    /// Sampling parameters.
    pub params: InferenceParams,
}

impl GenerationRequest {
    /// User segments in send order, with the attachment reference last.
    pub fn segments(&self) -> Vec<String> {
        let mut out = match &self.user {
            UserMessage::Text(t) => vec![t.clone()],
            UserMessage::Segments(parts) => parts.clone(),
        };
        if let Some(path) = self.attachment.as_deref().filter(|p| !p.trim().is_empty()) {
            out.push(format!("{ATTACHMENT_LABEL}{path}"));
        }
        out
    }

    /// System instruction followed by every user segment, as one string.
    pub fn flattened(&self) -> String {
        let mut parts = Vec::with_capacity(4);
        if !self.system.trim().is_empty() {
            parts.push(self.system.trim().to_string());
        }
        parts.extend(self.segments());
        parts.join(SEGMENT_SEPARATOR)
    }
}

/// Layout of the user content in a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// List of text-only parts; the system instruction travels separately.
    Segments,
    /// Single string containing the system instruction and all segments.
    SingleString,
}

impl BodyShape {
    pub fn label(self) -> &'static str {
        match self {
            BodyShape::Segments => "segments",
            BodyShape::SingleString => "single-string",
        }
    }
}

/// Renders `req` as a JSON body for `provider` in the given `shape`.
///
/// # Errors
/// Returns [`GatewayError::Decode`] if the body cannot be serialized.
pub fn build_body(
    provider: LlmProvider,
    model: &str,
    req: &GenerationRequest,
    shape: BodyShape,
) -> Result<Value> {
    let segments = req.segments();
    let flattened;

    let encoded = match provider {
        LlmProvider::Bedrock => {
            let body = match shape {
                BodyShape::Segments => BedrockBody {
                    system: (!req.system.trim().is_empty()).then(|| {
                        vec![TextPart {
                            text: req.system.trim(),
                        }]
                    }),
                    messages: vec![BedrockMessage {
                        role: "user",
                        content: Content::Parts(
                            segments.iter().map(|s| TextPart { text: s.as_str() }).collect(),
                        ),
                    }],
                    inference_config: BedrockInference {
                        max_tokens: req.params.max_tokens,
                        temperature: req.params.temperature,
                    },
                },
                BodyShape::SingleString => {
                    flattened = req.flattened();
                    BedrockBody {
                        system: None,
                        messages: vec![BedrockMessage {
                            role: "user",
                            content: Content::Text(&flattened),
                        }],
                        inference_config: BedrockInference {
                            max_tokens: req.params.max_tokens,
                            temperature: req.params.temperature,
                        },
                    }
                }
            };
            serde_json::to_value(body)
        }
        LlmProvider::OpenAI => {
            let mut messages = Vec::with_capacity(2);
            let user_content = match shape {
                BodyShape::Segments => {
                    if !req.system.trim().is_empty() {
                        messages.push(ChatMessage {
                            role: "system",
                            content: Content::Text(req.system.trim()),
                        });
                    }
                    Content::Parts(
                        segments
                            .iter()
                            .map(|s| ChatPart {
                                kind: "text",
                                text: s.as_str(),
                            })
                            .collect(),
                    )
                }
                BodyShape::SingleString => {
                    flattened = req.flattened();
                    Content::Text(&flattened)
                }
            };
            messages.push(ChatMessage {
                role: "user",
                content: user_content,
            });
            serde_json::to_value(ChatBody {
                model,
                messages,
                max_tokens: req.params.max_tokens,
                temperature: req.params.temperature,
            })
        }
    };

    encoded.map_err(|e| GatewayError::Decode(format!("failed to encode {} body: {e}", shape.label())))
}

/* ===========================================================================
Wire payloads
======================================================================== */

/// User content: a list of parts or a plain string.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Content<'a, P> {
    Parts(Vec<P>),
    Text(&'a str),
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct BedrockBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<Vec<TextPart<'a>>>,
    messages: Vec<BedrockMessage<'a>>,
    #[serde(rename = "inferenceConfig")]
    inference_config: BedrockInference,
}

#[derive(Debug, Serialize)]
struct BedrockMessage<'a> {
    role: &'a str,
    content: Content<'a, TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct BedrockInference {
    #[serde(rename = "maxTokens")]
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    /// One of: "system" | "user".
    role: &'a str,
    content: Content<'a, ChatPart<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatPart<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    text: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            system: "Answer from documents only.".into(),
            user: UserMessage::Segments(vec![
                "User question: rated power?".into(),
                "Knowledge Base context:\nSource: spec.pdf\n3.5 kW".into(),
            ]),
            attachment: Some("/data/machine_files.pdf".into()),
            params: InferenceParams {
                max_tokens: 256,
                temperature: 0.2,
            },
        }
    }

    #[test]
    fn attachment_becomes_last_segment() {
        let segs = request().segments();
        assert_eq!(segs.len(), 3);
        assert_eq!(
            segs[2],
            "Local document path (for reference): /data/machine_files.pdf"
        );
    }

    #[test]
    fn bedrock_segments_body_lists_text_parts() {
        let body = build_body(LlmProvider::Bedrock, "m", &request(), BodyShape::Segments).unwrap();

        assert_eq!(body["system"][0]["text"], "Answer from documents only.");
        let content = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content.len(), 3);
        assert!(content.iter().all(|p| p.as_object().unwrap().len() == 1));
        assert_eq!(body["inferenceConfig"]["maxTokens"], 256);
    }

    #[test]
    fn bedrock_single_string_folds_system_in() {
        let body =
            build_body(LlmProvider::Bedrock, "m", &request(), BodyShape::SingleString).unwrap();

        assert!(body.get("system").is_none());
        let content = body["messages"][0]["content"].as_str().unwrap();
        assert!(content.starts_with("Answer from documents only.\n\nUser question:"));
        assert!(content.ends_with("/data/machine_files.pdf"));
    }

    #[test]
    fn openai_bodies_carry_model_and_system_message() {
        let req = request();
        let primary = build_body(LlmProvider::OpenAI, "gpt-x", &req, BodyShape::Segments).unwrap();
        assert_eq!(primary["model"], "gpt-x");
        assert_eq!(primary["messages"][0]["role"], "system");
        assert_eq!(primary["messages"][1]["content"][0]["type"], "text");

        let fallback =
            build_body(LlmProvider::OpenAI, "gpt-x", &req, BodyShape::SingleString).unwrap();
        let messages = fallback["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0]["content"].is_string());
        assert_eq!(fallback["max_tokens"], 256);
    }

    #[test]
    fn temperature_is_sent_as_configured() {
        let req = request();
        let bedrock = build_body(LlmProvider::Bedrock, "m", &req, BodyShape::Segments).unwrap();
        assert_eq!(bedrock["inferenceConfig"]["temperature"], serde_json::json!(0.2));
        assert_eq!(bedrock.to_string().matches("0.2").count(), 1);
        assert!(!bedrock.to_string().contains("0.200000"));

        let chat = build_body(LlmProvider::OpenAI, "m", &req, BodyShape::SingleString).unwrap();
        assert_eq!(chat["temperature"], serde_json::json!(0.2));
    }

    #[test]
    fn plain_text_user_message_is_one_segment() {
        let req = GenerationRequest {
            system: String::new(),
            user: UserMessage::Text("hello".into()),
            attachment: None,
            params: InferenceParams {
                max_tokens: 10,
                temperature: 0.0,
            },
        };
        assert_eq!(req.segments(), vec!["hello".to_string()]);
        assert_eq!(req.flattened(), "hello");
    }
}
