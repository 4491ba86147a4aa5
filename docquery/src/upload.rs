//! Upload flow state machine.
//!
//! One pending upload per flow instance. File selection (picker or
//! drag-drop, both feed `select`) replaces any existing draft; a failed
//! upload keeps the draft so the user can retry without reselecting.
//! The drag-over highlight is a transient visual flag, not a stage.

use std::sync::{Arc, Mutex};

use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::models::Document;
use crate::store::DocumentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Idle,
    Selected,
    Uploading,
    Error,
}

#[derive(Debug, Clone)]
pub struct Draft {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
struct UploadState {
    draft: Option<Draft>,
    stage: UploadStage,
    error: Option<String>,
    drag_over: bool,
}

/// A point-in-time view of the flow for presentation polling.
#[derive(Debug, Clone)]
pub struct UploadSnapshot {
    pub filename: Option<String>,
    pub stage: UploadStage,
    pub error: Option<String>,
    pub drag_over: bool,
}

pub struct UploadFlow {
    client: Arc<ApiClient>,
    state: Mutex<UploadState>,
}

impl UploadFlow {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: Mutex::new(UploadState {
                draft: None,
                stage: UploadStage::Idle,
                error: None,
                drag_over: false,
            }),
        }
    }

    /// Stage a file for upload. Last selection wins; only presence is
    /// validated here (extension filtering happens at submit, in the
    /// transport client). Clears any previous error. Ignored while an
    /// upload is in flight.
    pub fn select(&self, filename: impl Into<String>, bytes: Vec<u8>) {
        let mut state = self.state.lock().unwrap();
        if state.stage == UploadStage::Uploading {
            return;
        }
        state.draft = Some(Draft {
            filename: filename.into(),
            bytes,
        });
        state.stage = UploadStage::Selected;
        state.error = None;
    }

    /// Toggle the drag-over highlight. Pure presentation state.
    pub fn set_drag_over(&self, drag_over: bool) {
        self.state.lock().unwrap().drag_over = drag_over;
    }

    /// Submit the staged draft.
    ///
    /// With no draft present this fails fast with a validation error and
    /// the flow stays idle, never touching the transport. While an upload
    /// is already in flight it is a no-op (`Ok(None)`) — single upload
    /// slot. On success the confirmed document is handed to the store,
    /// the draft cleared, and the flow returns to idle; on failure the
    /// draft is retained for retry and the flow moves to the error stage.
    pub async fn submit(&self, store: &DocumentStore) -> Result<Option<Document>> {
        let draft = {
            let mut state = self.state.lock().unwrap();
            match state.stage {
                UploadStage::Uploading => return Ok(None),
                _ => match state.draft.clone() {
                    Some(draft) => {
                        state.stage = UploadStage::Uploading;
                        state.error = None;
                        draft
                    }
                    None => {
                        let message = "Please select a file first".to_string();
                        state.stage = UploadStage::Idle;
                        state.error = Some(message.clone());
                        return Err(ClientError::Validation(message));
                    }
                },
            }
        };

        let result = self
            .client
            .upload_document(draft.bytes, &draft.filename)
            .await;

        let mut state = self.state.lock().unwrap();
        match result {
            Ok(doc) => {
                tracing::info!(id = doc.id, filename = %doc.filename, "upload confirmed");
                state.draft = None;
                state.stage = UploadStage::Idle;
                state.error = None;
                store.add_document(doc.clone());
                Ok(Some(doc))
            }
            Err(e) => {
                tracing::warn!(filename = %draft.filename, error = %e, "upload failed");
                state.stage = UploadStage::Error;
                state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub fn snapshot(&self) -> UploadSnapshot {
        let state = self.state.lock().unwrap();
        UploadSnapshot {
            filename: state.draft.as_ref().map(|d| d.filename.clone()),
            stage: state.stage,
            error: state.error.clone(),
            drag_over: state.drag_over,
        }
    }
}
