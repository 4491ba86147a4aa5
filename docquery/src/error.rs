use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl ClientError {
    /// True when the failure was detected client-side, before any request
    /// was issued.
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    /// The message controllers store in their `error` field. Transport
    /// details are collapsed into a short retryable-action phrasing; the
    /// full error stays available through `Display` for logs.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Network(_) => "Could not reach the server, please retry".to_string(),
            ClientError::Server { status, message } => {
                format!("Server rejected the request ({status}): {message}")
            }
            ClientError::NotFound(msg) => format!("Not found: {msg}"),
            ClientError::Json(_) => "The server returned an unreadable response".to_string(),
            ClientError::Io(e) => format!("IO error: {e}"),
            ClientError::UrlParse(e) => format!("Invalid URL: {e}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
