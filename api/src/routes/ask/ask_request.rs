use qa_pipeline::QaAnswer;
use serde::{Deserialize, Serialize};

/// Request payload for /ask.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question.
    pub question: String,
    /// Optional override for the number of knowledge-base hits.
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// Response payload for /ask.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// Model answer, or the denial text for rejected questions.
    pub answer: String,
    /// Whether the prompt guard let the question through.
    pub admitted: bool,
    /// Guard reason (`"OK"` when admitted).
    pub reason: String,
    /// Hits the answer was grounded on.
    pub context: Vec<CtxItem>,
}

/// Knowledge-base hit as shown to clients.
#[derive(Debug, Serialize)]
pub struct CtxItem {
    pub title: String,
    pub source: String,
    pub score: f32,
    pub content: String,
}

impl From<QaAnswer> for AskResponse {
    fn from(qa: QaAnswer) -> Self {
        Self {
            answer: qa.answer,
            admitted: qa.verdict.admitted,
            reason: qa.verdict.reason,
            context: qa
                .context
                .into_iter()
                .map(|h| CtxItem {
                    title: h.title,
                    source: h.source,
                    score: h.score,
                    content: h.content,
                })
                .collect(),
        }
    }
}
