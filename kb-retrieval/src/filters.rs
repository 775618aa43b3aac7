//! Request body for the retrieval endpoint.
//!
//! Supports exact equality on one metadata key (see [`SourceFilter`]).

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::record::{KbQuery, SourceFilter};

/// Converts a [`KbQuery`] into the retrieval request body.
///
/// ```json
/// {"retrievalQuery":{"text":"…"},
///  "retrievalConfiguration":{"vectorSearchConfiguration":{
///     "numberOfResults":3,"overrideSearchType":"HYBRID",
///     "filter":{"equals":{"key":"…","value":"…"}}}}}
/// ```
pub fn to_request_body(query: &KbQuery<'_>) -> Result<Value, serde_json::Error> {
    debug!(
        "filters::to_request_body top_k={} mode={} filter={}",
        query.top_k,
        query.mode,
        query.filter.is_some()
    );

    serde_json::to_value(RetrieveRequest {
        retrieval_query: RetrievalQuery { text: query.text },
        retrieval_configuration: RetrievalConfiguration {
            vector_search_configuration: VectorSearchConfiguration {
                number_of_results: query.top_k,
                override_search_type: query.mode.as_wire(),
                filter: query.filter.as_ref().map(|f| FilterSpec {
                    equals: Equals::from(f),
                }),
            },
        },
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveRequest<'a> {
    retrieval_query: RetrievalQuery<'a>,
    retrieval_configuration: RetrievalConfiguration<'a>,
}

#[derive(Serialize)]
struct RetrievalQuery<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalConfiguration<'a> {
    vector_search_configuration: VectorSearchConfiguration<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VectorSearchConfiguration<'a> {
    number_of_results: usize,
    override_search_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<FilterSpec<'a>>,
}

#[derive(Serialize)]
struct FilterSpec<'a> {
    equals: Equals<'a>,
}

#[derive(Serialize)]
struct Equals<'a> {
    key: &'a str,
    value: &'a str,
}

impl<'a> From<&'a SourceFilter> for Equals<'a> {
    fn from(f: &'a SourceFilter) -> Self {
        Self {
            key: &f.key,
            value: &f.value,
        }
    }
}
