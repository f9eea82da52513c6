use crate::core::transform::{transform_detail, transform_search_response};
use crate::models::{RecipeDetail, RecipeSummary, SearchFilters};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde_json::Value;
use thiserror::Error;

const PREVIEW_CHARS: usize = 120;

/// Errors seen by the client when talking to the proxy
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Unexpected non-JSON response. First 120 chars: {preview}")]
    UnexpectedContentType { status: u16, preview: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Caller for the proxy's `/api` endpoints
///
/// No timeout is set on this hop; the transport defaults apply.
#[derive(Clone)]
pub struct ProxyClient {
    base_url: String,
    client: Client,
}

impl ProxyClient {
    /// `base_url` is the origin serving `/api`, e.g. `http://localhost:7071`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    pub async fn search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<RecipeSummary>, ClientError> {
        let url = format!("{}/api/recipes/search", self.base_url.trim_end_matches('/'));

        let mut params = vec![("query".to_string(), query.to_string())];
        params.extend(filters.query_pairs());

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&params)
            .send()
            .await?;

        let body = read_json(response, "Failed to search recipes").await?;
        Ok(transform_search_response(&body))
    }

    pub async fn recipe_details(&self, id: i64, is_favorite: bool) -> Result<RecipeDetail, ClientError> {
        let url = format!("{}/api/recipe/{}", self.base_url.trim_end_matches('/'), id);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let body = read_json(response, "Failed to fetch recipe details").await?;
        transform_detail(&body, is_favorite).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

/// Check status and content type, then parse the body as JSON
async fn read_json(response: Response, failure_prefix: &str) -> Result<Value, ClientError> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    let text = response.text().await?;

    if !status.is_success() {
        let message = error_message(&text, is_json)
            .unwrap_or_else(|| format!("{} ({})", failure_prefix, status.as_u16()));
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    if !is_json {
        return Err(ClientError::UnexpectedContentType {
            status: status.as_u16(),
            preview: text.chars().take(PREVIEW_CHARS).collect(),
        });
    }

    serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

/// The `error` field of a JSON error body, or a plain-text body as-is
fn error_message(text: &str, is_json: bool) -> Option<String> {
    if is_json {
        serde_json::from_str::<Value>(text)
            .ok()
            .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
            .filter(|message| !message.is_empty())
    } else {
        Some(text.trim().to_string()).filter(|message| !message.is_empty())
    }
}
