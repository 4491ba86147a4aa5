//! Client SDK for a document-upload-and-ask retrieval Q&A backend.
//!
//! Upload text files, let the backend index them, then ask natural-language
//! questions answered with citations back to the source documents. The
//! crate covers the client-side orchestration only: a typed transport
//! client plus three controllers (document store, upload flow, chat) that
//! keep local state consistent across overlapping asynchronous operations.
//! Rendering is up to the embedding application; each controller exposes a
//! cheap `snapshot()` for presentation polling.

pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod upload;

pub use chat::{ChatController, ChatSnapshot, Exchange};
pub use client::ApiClient;
pub use config::Config;
pub use error::{ClientError, Result};
pub use models::{Document, Metadata, QueryRequest, QueryResponse, QuerySourceNode};
pub use store::{DocumentStore, StoreSnapshot};
pub use upload::{UploadFlow, UploadSnapshot, UploadStage};
