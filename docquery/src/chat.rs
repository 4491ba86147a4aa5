//! Query/conversation controller.
//!
//! Accumulates an append-only transcript of question/answer exchanges
//! for the current session. At most one query is in flight at a time;
//! because submissions are serialized, transcript order and response
//! arrival order coincide and no request tagging is needed.

use std::sync::{Arc, Mutex};

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::QueryResponse;

/// One completed question/answer exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub query: String,
    pub response: QueryResponse,
}

#[derive(Debug, Default)]
struct ChatState {
    transcript: Vec<Exchange>,
    loading: bool,
    error: Option<String>,
    input: String,
}

/// A point-in-time view of the conversation for presentation polling.
#[derive(Debug, Clone)]
pub struct ChatSnapshot {
    pub transcript: Vec<Exchange>,
    pub loading: bool,
    pub error: Option<String>,
    pub input: String,
}

pub struct ChatController {
    client: Arc<ApiClient>,
    state: Mutex<ChatState>,
    top_k: u32,
    rerank: bool,
}

impl ChatController {
    pub fn new(client: Arc<ApiClient>, top_k: u32, rerank: bool) -> Self {
        Self {
            client,
            state: Mutex::new(ChatState::default()),
            top_k,
            rerank,
        }
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.state.lock().unwrap().input = text.into();
    }

    /// Submit the current input as a query.
    ///
    /// A blank input or an already-loading controller makes this a no-op
    /// (`Ok(None)`): the single-flight check happens under the lock, so a
    /// concurrent second submit never reaches the transport. On success
    /// the exchange is appended and the input cleared; on failure the
    /// transcript and input are left untouched so the user can retry the
    /// same question, and the error is recorded. `loading` is false
    /// afterwards either way.
    pub async fn submit(&self) -> Result<Option<QueryResponse>> {
        let text = {
            let mut state = self.state.lock().unwrap();
            if state.loading || state.input.trim().is_empty() {
                return Ok(None);
            }
            state.loading = true;
            state.error = None;
            state.input.clone()
        };

        let result = self.client.query(&text, self.top_k, self.rerank).await;

        let mut state = self.state.lock().unwrap();
        state.loading = false;
        match result {
            Ok(response) => {
                state.transcript.push(Exchange {
                    query: text,
                    response: response.clone(),
                });
                state.input.clear();
                Ok(Some(response))
            }
            Err(e) => {
                tracing::warn!(error = %e, "query failed");
                state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        let state = self.state.lock().unwrap();
        ChatSnapshot {
            transcript: state.transcript.clone(),
            loading: state.loading,
            error: state.error.clone(),
            input: state.input.clone(),
        }
    }
}
