//! Retrieval facade over a hosted knowledge base.
//!
//! This crate provides a small API to:
//! - Send a free-text query with result count, search mode and an optional
//!   source filter
//! - Turn whatever hit layout comes back into canonical [`KbHit`]s
//!
//! Ranking, embeddings and storage live in the hosted service.

mod client;
mod config;
mod errors;
mod filters;
pub mod probe;
mod record;

use std::{future::Future, pin::Pin};

pub use client::KbHttpClient;
pub use config::{DEFAULT_SOURCE_KEY, KbConfig};
pub use errors::RetrievalError;
pub use record::{KbHit, KbQuery, SearchMode, SourceFilter, UNKNOWN};

use tracing::debug;

/// Retrieval interface used by the question pipeline.
///
/// Implement this trait to plug in another retrieval backend or a test double.
pub trait KnowledgeBase: Send + Sync {
    /// Default query settings for this knowledge base.
    fn defaults(&self) -> QueryDefaults;

    /// Runs one query; hits keep the service's ranking order.
    fn retrieve<'a>(
        &'a self,
        query: &'a KbQuery<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<KbHit>, RetrievalError>> + Send + 'a>>;
}

/// Per-knowledge-base defaults applied when the caller does not override them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryDefaults {
    pub top_k: usize,
    pub mode: SearchMode,
    pub filter: Option<SourceFilter>,
}

impl QueryDefaults {
    /// Builds a query for `text`, with `top_k` overriding the default when given.
    pub fn query<'a>(&self, text: &'a str, top_k: Option<usize>) -> KbQuery<'a> {
        KbQuery {
            text,
            top_k: top_k.filter(|k| *k > 0).unwrap_or(self.top_k),
            mode: self.mode,
            filter: self.filter.clone(),
        }
    }
}

/// High-level facade that wires configuration and the HTTP client.
///
/// This is the entry point recommended for application code.
#[derive(Debug, Clone)]
pub struct KnowledgeBaseClient {
    cfg: KbConfig,
    client: KbHttpClient,
}

impl KnowledgeBaseClient {
    /// Constructs a client from a validated configuration.
    ///
    /// # Errors
    /// Returns `RetrievalError::Config` if validation or client setup fails.
    pub fn new(cfg: KbConfig) -> Result<Self, RetrievalError> {
        cfg.validate()?;
        debug!("KnowledgeBaseClient::new kb_id={}", cfg.kb_id);
        let client = KbHttpClient::new(&cfg)?;
        Ok(Self { cfg, client })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &KbConfig {
        &self.cfg
    }
}

impl KnowledgeBase for KnowledgeBaseClient {
    fn defaults(&self) -> QueryDefaults {
        QueryDefaults {
            top_k: self.cfg.top_k,
            mode: self.cfg.mode,
            filter: self.cfg.source_filter(),
        }
    }

    fn retrieve<'a>(
        &'a self,
        query: &'a KbQuery<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<KbHit>, RetrievalError>> + Send + 'a>> {
        Box::pin(self.client.retrieve(query))
    }
}
