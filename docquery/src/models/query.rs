use serde::{Deserialize, Serialize};

use super::Metadata;

/// Request body for `POST /query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_rerank")]
    pub rerank: bool,
}

fn default_top_k() -> u32 {
    5
}

fn default_rerank() -> bool {
    true
}

/// One retrieved excerpt backing an answer.
///
/// `document_id` references a cached `Document` but may point at one that
/// was deleted since retrieval; consumers must tolerate dangling ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySourceNode {
    pub text: String,
    pub document_id: i64,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl QuerySourceNode {
    /// Relevance score rendered with fixed two-decimal precision.
    pub fn score_display(&self) -> String {
        format!("{:.2}", self.score)
    }
}

/// Response for `POST /query`. Immutable once received; the conversation
/// transcript stores these verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub query: String,
    pub answer: String,
    pub sources: Vec<QuerySourceNode>,
}
