//! Document store controller.
//!
//! Owns the cached, insertion-ordered document collection and keeps it
//! aligned with the server through the transport client. The cache
//! reflects server state as of the last successful list/upload/delete
//! response; it is not a live subscription, so it can silently diverge
//! if another client mutates documents concurrently.

use std::sync::{Arc, Mutex};

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::Document;

#[derive(Debug, Clone, Default)]
struct StoreState {
    documents: Vec<Document>,
    loading: bool,
    error: Option<String>,
    initialized: bool,
}

/// A point-in-time view of the store for presentation polling.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub documents: Vec<Document>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct DocumentStore {
    client: Arc<ApiClient>,
    state: Mutex<StoreState>,
}

impl DocumentStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// One-shot reconciliation with the authoritative server list.
    ///
    /// Runs at most once per store lifetime; subsequent calls are no-ops.
    /// On success the collection is replaced wholesale and any stale
    /// error cleared; on failure the collection stays empty and the
    /// user-facing message is recorded. `loading` is false afterwards
    /// either way.
    pub async fn initialize(&self) -> Result<()> {
        {
            let mut state = self.state.lock().unwrap();
            if state.initialized {
                return Ok(());
            }
            state.initialized = true;
            state.loading = true;
        }

        let result = self.client.list_documents().await;

        let mut state = self.state.lock().unwrap();
        state.loading = false;
        match result {
            Ok(documents) => {
                tracing::info!(count = documents.len(), "document list loaded");
                state.documents = documents;
                state.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load document list");
                state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Append a document the server just confirmed, skipping ids already
    /// present. Pure local mutation, no I/O. Called by the upload flow.
    pub fn add_document(&self, doc: Document) {
        let mut state = self.state.lock().unwrap();
        if state.documents.iter().any(|d| d.id == doc.id) {
            return;
        }
        state.documents.push(doc);
    }

    /// Delete a document, pessimistically: the server confirms first and
    /// the cached entry is removed only after success. On failure the
    /// collection is untouched and the error recorded. Removing an id
    /// the cache never held is a local no-op.
    pub async fn remove_document(&self, id: i64) -> Result<()> {
        let result = self.client.delete_document(id).await;

        let mut state = self.state.lock().unwrap();
        match result {
            Ok(()) => {
                state.documents.retain(|d| d.id != id);
                state.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "failed to delete document");
                state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.lock().unwrap();
        StoreSnapshot {
            documents: state.documents.clone(),
            loading: state.loading,
            error: state.error.clone(),
        }
    }
}
