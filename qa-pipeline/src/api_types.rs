//! Public API types re-used by external crates (e.g., the HTTP API layer).

use kb_retrieval::KbHit;
use serde::Serialize;

use crate::prompt_guard::ValidationVerdict;

/// Per-question overrides.
///
/// # Example
/// ```
/// use qa_pipeline::AskOptions;
/// let opts = AskOptions { top_k: Some(5) };
/// assert_eq!(opts.top_k, Some(5));
/// ```
#[derive(Clone, Debug, Default)]
pub struct AskOptions {
    /// Number of hits to request. `None` or `Some(0)` keeps the knowledge-base default.
    pub top_k: Option<usize>,
}

/// Final answer together with the verdict and the hits fed to the model.
#[derive(Clone, Debug, Serialize)]
pub struct QaAnswer {
    pub answer: String,
    pub verdict: ValidationVerdict,
    pub context: Vec<KbHit>,
}
