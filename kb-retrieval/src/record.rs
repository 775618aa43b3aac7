//! Core data models used by the library.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::RetrievalError;

/// Placeholder for hit fields the service did not return.
pub const UNKNOWN: &str = "unknown";

/// One retrieved excerpt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KbHit {
    /// Document title (or file name when no title is stored).
    pub title: String,
    /// Excerpt text.
    pub content: String,
    /// Source identifier, usually an object-store URI.
    pub source: String,
    /// Relevance score reported by the service (0.0 when absent).
    pub score: f32,
}

/// Search strategy requested from the knowledge base.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Vector + keyword search.
    #[default]
    Hybrid,
    /// Vector search only.
    Semantic,
}

impl SearchMode {
    /// Wire value for `overrideSearchType`.
    pub fn as_wire(self) -> &'static str {
        match self {
            SearchMode::Hybrid => "HYBRID",
            SearchMode::Semantic => "SEMANTIC",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchMode::Hybrid => "hybrid",
            SearchMode::Semantic => "semantic",
        })
    }
}

impl FromStr for SearchMode {
    type Err = RetrievalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hybrid" => Ok(SearchMode::Hybrid),
            "semantic" => Ok(SearchMode::Semantic),
            other => Err(RetrievalError::Config(format!(
                "unknown search mode `{other}` (expected hybrid or semantic)"
            ))),
        }
    }
}

/// Exact match on one metadata key, e.g. the document source URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFilter {
    pub key: String,
    pub value: String,
}

/// Query parameters for retrieval.
#[derive(Clone, Debug)]
pub struct KbQuery<'a> {
    pub text: &'a str,
    pub top_k: usize,
    pub mode: SearchMode,
    pub filter: Option<SourceFilter>,
}
