//! Typed HTTP client for the document Q&A backend.
//!
//! One method per backend capability; every call is asynchronous,
//! independently failable, and at-most-once. No retries happen here:
//! a retried upload after a timeout may create a duplicate document
//! server-side, so retry is always an explicit user action.

use std::time::Duration;

use reqwest::{multipart, Client, StatusCode};

use crate::config::{Config, MAX_TOP_K, MIN_TOP_K};
use crate::error::{ClientError, Result};
use crate::models::{Document, QueryRequest, QueryResponse};

#[cfg(test)]
mod tests;

/// File extensions accepted by the client-side upload filter. The server
/// remains the authority on actual content validation.
pub const UPLOAD_EXTENSIONS: &[&str] = &["md", "txt"];

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        // Reject malformed base URLs up front rather than on first request.
        url::Url::parse(&config.base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /documents` — the authoritative document list.
    pub async fn list_documents(&self) -> Result<Vec<Document>> {
        let url = format!("{}/documents", self.base_url);
        tracing::debug!(%url, "listing documents");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        Ok(resp.json().await?)
    }

    /// `GET /documents/{id}` — a single document, 404 when missing.
    pub async fn get_document(&self, id: i64) -> Result<Document> {
        let url = format!("{}/documents/{}", self.base_url, id);
        tracing::debug!(%url, "fetching document");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        Ok(resp.json().await?)
    }

    /// `POST /documents/upload` — multipart upload, field `file`.
    ///
    /// Client-side preconditions: a non-empty filename with an `.md` or
    /// `.txt` extension. Anything else fails with `Validation` before any
    /// request is issued.
    pub async fn upload_document(&self, bytes: Vec<u8>, filename: &str) -> Result<Document> {
        if filename.trim().is_empty() {
            return Err(ClientError::Validation(
                "No file selected for upload".to_string(),
            ));
        }

        let extension = filename.rsplit('.').next().unwrap_or_default().to_lowercase();
        if filename.rsplit('.').count() < 2 || !UPLOAD_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ClientError::Validation(format!(
                "Unsupported file type '{filename}': only .md and .txt files are accepted"
            )));
        }

        let mime = mime_guess::from_path(filename).first_or_octet_stream();
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime.essence_str())?;
        let form = multipart::Form::new().part("file", part);

        let url = format!("{}/documents/upload", self.base_url);
        tracing::debug!(%url, filename, "uploading document");

        let resp = self.client.post(&url).multipart(form).send().await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        Ok(resp.json().await?)
    }

    /// `DELETE /documents/{id}` — 404 maps to `NotFound`.
    pub async fn delete_document(&self, id: i64) -> Result<()> {
        let url = format!("{}/documents/{}", self.base_url, id);
        tracing::debug!(%url, "deleting document");

        let resp = self.client.delete(&url).send().await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        Ok(())
    }

    /// `POST /query` — JSON body `{query, top_k, rerank}`.
    ///
    /// Blank query text fails with `Validation` before any request is
    /// issued. `top_k` is clamped to the backend's accepted range.
    pub async fn query(&self, text: &str, top_k: u32, rerank: bool) -> Result<QueryResponse> {
        if text.trim().is_empty() {
            return Err(ClientError::Validation(
                "Query text cannot be empty".to_string(),
            ));
        }

        let request = QueryRequest {
            query: text.to_string(),
            top_k: top_k.clamp(MIN_TOP_K, MAX_TOP_K),
            rerank,
        };

        let url = format!("{}/query", self.base_url);
        tracing::debug!(%url, top_k = request.top_k, rerank, "submitting query");

        let resp = self.client.post(&url).json(&request).send().await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        Ok(resp.json().await?)
    }
}

/// Map a non-success response to the error taxonomy. The message is
/// pulled from the body's `detail` (FastAPI) or `error` field when the
/// body is JSON, falling back to the raw body or the status reason.
async fn error_from_response(resp: reqwest::Response) -> ClientError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .or_else(|| value.get("error"))
                .and_then(|m| m.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| {
            if body.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body.clone()
            }
        });

    if status == StatusCode::NOT_FOUND {
        ClientError::NotFound(message)
    } else {
        ClientError::Server {
            status: status.as_u16(),
            message,
        }
    }
}
