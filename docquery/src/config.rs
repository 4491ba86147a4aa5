use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TOP_K: u32 = 5;

// Backend contract bounds for top_k (pydantic: ge=1, le=20).
pub const MIN_TOP_K: u32 = 1;
pub const MAX_TOP_K: u32 = 20;

/// Client configuration, read once from the environment at startup and
/// passed into `ApiClient::new`. No module-level state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend API, including any path prefix.
    pub base_url: String,
    /// Per-request timeout applied to the HTTP client.
    pub timeout_secs: u64,
    /// Default number of source nodes requested per query.
    pub top_k: u32,
    /// Whether queries request a second-pass relevance rerank by default.
    pub rerank: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let base_url: String = parse_env_or("DOCQUERY_BASE_URL", DEFAULT_BASE_URL.to_string());
        let top_k: u32 = parse_env_or("DOCQUERY_TOP_K", DEFAULT_TOP_K);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs: parse_env_or("DOCQUERY_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            top_k: top_k.clamp(MIN_TOP_K, MAX_TOP_K),
            rerank: parse_env_or("DOCQUERY_RERANK", true),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            top_k: DEFAULT_TOP_K,
            rerank: true,
        }
    }
}
