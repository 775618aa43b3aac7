//! Guarded, document-grounded question answering.
//!
//! Public API: [`QaPipeline::ask`]. It runs the prompt guard, retrieves
//! context from the knowledge base, builds the labeled user segments, calls
//! the hosted model (primary body, then fallback body), and returns the
//! normalized answer together with the hits that were used.

mod api_types;
mod cfg;
mod error;
pub mod prompt;
pub mod prompt_guard;

pub use api_types::{AskOptions, QaAnswer};
pub use cfg::{DEFAULT_MAX_CTX_CHARS, PipelineConfig};
pub use error::PipelineError;
pub use prompt_guard::{RejectionCategory, ValidationVerdict, evaluate};

use llm_gateway::{GenerationRequest, UserMessage, generate};
use tracing::{debug, info, warn};

/// Question-answering facade. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct QaPipeline {
    cfg: PipelineConfig,
}

impl QaPipeline {
    pub fn new(cfg: PipelineConfig) -> Self {
        Self { cfg }
    }

    /// Startup configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Answers `question` from the knowledge base.
    ///
    /// Rejected questions come back as `"Request denied: {reason}"` with an
    /// empty context; nothing is sent to the knowledge base or the model.
    /// Generation failures are reported inside `answer` rather than as errors.
    ///
    /// # Errors
    /// `PipelineError::Retrieval` when the knowledge-base query fails.
    pub async fn ask(&self, question: &str, opts: AskOptions) -> Result<QaAnswer, PipelineError> {
        let verdict = evaluate(question);
        if !verdict.admitted {
            info!(category = ?verdict.category, "question rejected by prompt guard");
            return Ok(QaAnswer {
                answer: format!("Request denied: {}", verdict.reason),
                verdict,
                context: Vec::new(),
            });
        }

        let query = self.cfg.kb.defaults().query(question, opts.top_k);
        let hits = self.cfg.kb.retrieve(&query).await.map_err(|e| {
            warn!(error = %e, "knowledge base query failed");
            PipelineError::from(e)
        })?;
        debug!(hits = hits.len(), top_k = query.top_k, "retrieved context");

        let context = prompt::build_context(&hits, self.cfg.max_ctx_chars);
        let req = GenerationRequest {
            system: prompt::SYSTEM_PROMPT.to_string(),
            user: UserMessage::Segments(prompt::user_segments(question, &context)),
            attachment: self.cfg.doc_reference_path.clone(),
            params: self.cfg.params,
        };

        let answer = generate(self.cfg.invoker.as_ref(), &req).await;

        Ok(QaAnswer {
            answer,
            verdict,
            context: hits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{
        future::Future,
        pin::Pin,
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use kb_retrieval::{KbHit, KbQuery, KnowledgeBase, RetrievalError, SearchMode};
    use llm_gateway::{GatewayError, InferenceParams, LlmProvider, ModelInvoker};
    use serde_json::Value;

    struct FakeKb {
        calls: AtomicUsize,
        seen_top_k: Mutex<Option<usize>>,
        fail: bool,
    }

    impl FakeKb {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seen_top_k: Mutex::new(None),
                fail,
            }
        }
    }

    impl KnowledgeBase for FakeKb {
        fn defaults(&self) -> kb_retrieval::QueryDefaults {
            kb_retrieval::QueryDefaults {
                top_k: 3,
                mode: SearchMode::Hybrid,
                filter: None,
            }
        }

        fn retrieve<'a>(
            &'a self,
            query: &'a KbQuery<'a>,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<KbHit>, RetrievalError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_top_k.lock().unwrap() = Some(query.top_k);
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    return Err(RetrievalError::Config("kb offline".into()));
                }
                Ok(vec![KbHit {
                    title: "machine_files.pdf".into(),
                    content: "XR-220 Rated Power: 3.5 kW".into(),
                    source: "s3://docs/documents/machine_files.pdf".into(),
                    score: 0.91,
                }])
            })
        }
    }

    struct FakeModel {
        bodies: Mutex<Vec<Value>>,
        fail_primary: bool,
    }

    impl ModelInvoker for FakeModel {
        fn provider(&self) -> LlmProvider {
            LlmProvider::Bedrock
        }

        fn model(&self) -> &str {
            "test-model"
        }

        fn invoke<'a>(
            &'a self,
            body: &'a Value,
        ) -> Pin<Box<dyn Future<Output = llm_gateway::Result<String>> + Send + 'a>> {
            let mut bodies = self.bodies.lock().unwrap();
            bodies.push(body.clone());
            let first = bodies.len() == 1;
            let fail = self.fail_primary && first;
            Box::pin(async move {
                if fail {
                    Err(GatewayError::Decode("primary shape refused".into()))
                } else {
                    Ok("The XR-220 is rated at 3.5 kW. Source: machine_files.pdf".to_string())
                }
            })
        }
    }

    fn pipeline(kb: Arc<FakeKb>, model: Arc<FakeModel>) -> QaPipeline {
        QaPipeline::new(PipelineConfig {
            kb,
            invoker: model,
            params: InferenceParams {
                max_tokens: 512,
                temperature: 0.2,
            },
            doc_reference_path: Some("/mnt/data/machine_files.pdf".into()),
            max_ctx_chars: DEFAULT_MAX_CTX_CHARS,
        })
    }

    fn model(fail_primary: bool) -> Arc<FakeModel> {
        Arc::new(FakeModel {
            bodies: Mutex::new(Vec::new()),
            fail_primary,
        })
    }

    #[tokio::test]
    async fn rejected_question_never_reaches_kb_or_model() {
        let kb = Arc::new(FakeKb::new(false));
        let llm = model(false);
        let qa = pipeline(kb.clone(), llm.clone())
            .ask("What stock should I buy?", AskOptions::default())
            .await
            .unwrap();

        assert_eq!(qa.answer, "Request denied: I cannot give personalized investment advice.");
        assert!(!qa.verdict.admitted);
        assert!(qa.context.is_empty());
        assert_eq!(kb.calls.load(Ordering::SeqCst), 0);
        assert!(llm.bodies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn admitted_question_sends_three_segments() {
        let kb = Arc::new(FakeKb::new(false));
        let llm = model(false);
        let qa = pipeline(kb.clone(), llm.clone())
            .ask("What is the rated power of the XR-220?", AskOptions { top_k: Some(5) })
            .await
            .unwrap();

        assert!(qa.verdict.admitted);
        assert!(qa.answer.contains("3.5 kW"));
        assert_eq!(qa.context.len(), 1);
        assert_eq!(*kb.seen_top_k.lock().unwrap(), Some(5));

        let bodies = llm.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        let parts = bodies[0]["messages"][0]["content"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts[0]["text"].as_str().unwrap().starts_with("User question: "));
        assert!(
            parts[1]["text"]
                .as_str()
                .unwrap()
                .contains("Source: machine_files.pdf\nXR-220 Rated Power: 3.5 kW")
        );
        assert_eq!(
            parts[2]["text"],
            "Local document path (for reference): /mnt/data/machine_files.pdf"
        );
    }

    #[tokio::test]
    async fn fallback_body_is_a_single_string() {
        let llm = model(true);
        let qa = pipeline(Arc::new(FakeKb::new(false)), llm.clone())
            .ask("What is the maintenance interval?", AskOptions::default())
            .await
            .unwrap();

        assert!(qa.answer.contains("3.5 kW"));
        let bodies = llm.bodies.lock().unwrap();
        assert_eq!(bodies.len(), 2);
        assert!(bodies[1]["messages"][0]["content"].is_string());
    }

    #[tokio::test]
    async fn retrieval_failure_is_an_error() {
        let err = pipeline(Arc::new(FakeKb::new(true)), model(false))
            .ask("What is the rated power?", AskOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Retrieval(_)));
    }
}
