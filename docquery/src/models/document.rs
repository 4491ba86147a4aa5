use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque key-value metadata attached to documents and source nodes.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A document indexed by the backend.
///
/// The server owns these; the client holds a cached, possibly-stale copy.
/// `id` is server-assigned and immutable. The client never mutates a
/// document in place, only its membership in the cached collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub filename: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
