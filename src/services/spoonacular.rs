use crate::config::ProviderSettings;
use crate::core::transform::{transform_detail, transform_search_response};
use crate::models::{RecipeDetail, RecipeSummary, SearchFilters};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";
pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const SEARCH_FAILED: &str = "Failed to search recipes";
const DETAILS_FAILED: &str = "Failed to get recipe details";

/// Parameters callers may not override through pass-through filters
const RESERVED_PARAMS: [&str; 2] = ["apiKey", "query"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// No response within the request timeout
    Timeout,
    /// Connection or protocol failure before a status was received
    Transport,
    /// Provider answered with a non-2xx status
    Status,
    /// Provider answered 2xx but the body was not what we expected
    MalformedBody,
}

/// Uniform failure of a Spoonacular call
///
/// `message` is the best description available: the provider's own message,
/// then the transport error text, then a fixed per-operation default.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    /// Upstream HTTP status, when one was received
    pub status: Option<u16>,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            kind,
            message: message.into(),
            status,
        }
    }
}

/// Spoonacular API client
///
/// Attaches the API key and a fixed timeout to every request, and reduces
/// every failure to a [`ProviderError`]. No retries.
pub struct SpoonacularClient {
    base_url: String,
    api_key: String,
    page_size: u32,
    client: Client,
}

impl SpoonacularClient {
    /// Create a client with the default timeout and page size
    pub fn new(base_url: String, api_key: String) -> Self {
        Self::with_options(base_url, api_key, DEFAULT_TIMEOUT, DEFAULT_PAGE_SIZE)
    }

    pub fn with_options(base_url: String, api_key: String, timeout: Duration, page_size: u32) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            page_size,
            client,
        }
    }

    /// Build a client from settings, or `None` when no API key is configured
    pub fn from_settings(settings: &ProviderSettings) -> Option<Self> {
        let api_key = settings.api_key()?;
        Some(Self::with_options(
            settings.base_url.clone(),
            api_key.to_string(),
            Duration::from_secs(settings.timeout_secs),
            settings.page_size,
        ))
    }

    /// Run a `complexSearch` and return the provider JSON as-is
    pub async fn search_recipes(&self, query: &str, filters: &SearchFilters) -> Result<Value, ProviderError> {
        let url = format!("{}/recipes/complexSearch", self.base_url.trim_end_matches('/'));
        let params = self.search_params(query, filters);

        self.fetch("search", &url, &params, SEARCH_FAILED).await
    }

    /// Fetch `/recipes/{id}/information` with nutrition and return the provider JSON as-is
    pub async fn get_recipe_details(&self, id: i64) -> Result<Value, ProviderError> {
        let url = format!("{}/recipes/{}/information", self.base_url.trim_end_matches('/'), id);
        let params = vec![
            ("apiKey".to_string(), self.api_key.clone()),
            ("includeNutrition".to_string(), "true".to_string()),
        ];

        self.fetch("details", &url, &params, DETAILS_FAILED).await
    }

    /// Search and transform into summaries
    pub async fn search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<RecipeSummary>, ProviderError> {
        let body = self.search_recipes(query, filters).await?;
        Ok(transform_search_response(&body))
    }

    /// Fetch and transform a single recipe
    pub async fn get_detail(&self, id: i64) -> Result<RecipeDetail, ProviderError> {
        let body = self.get_recipe_details(id).await?;
        transform_detail(&body, false)
            .map_err(|e| ProviderError::new(ProviderErrorKind::MalformedBody, e.to_string(), None))
    }

    fn search_params(&self, query: &str, filters: &SearchFilters) -> Vec<(String, String)> {
        let mut params = vec![
            ("apiKey".to_string(), self.api_key.clone()),
            ("query".to_string(), query.to_string()),
            ("number".to_string(), filters.number.unwrap_or(self.page_size).to_string()),
            ("addRecipeInformation".to_string(), "true".to_string()),
            ("fillIngredients".to_string(), "true".to_string()),
        ];

        for (name, value) in filters.named_pairs() {
            params.push((name.to_string(), value));
        }

        // Pass-through filters may replace defaults such as `number`, but never the key or query
        for (name, value) in &filters.extra {
            if RESERVED_PARAMS.contains(&name.as_str()) {
                tracing::debug!("Ignoring reserved pass-through filter: {}", name);
                continue;
            }
            match params.iter_mut().find(|slot| slot.0 == *name) {
                Some(slot) => slot.1 = value.clone(),
                None => params.push((name.clone(), value.clone())),
            }
        }

        params
    }

    async fn fetch(
        &self,
        operation: &str,
        url: &str,
        params: &[(String, String)],
        default_message: &str,
    ) -> Result<Value, ProviderError> {
        tracing::debug!("Spoonacular {} request: {}?{}", operation, url, redacted_query(params));

        let response = match self.client.get(url).query(params).send().await {
            Ok(response) => response,
            Err(e) => {
                let kind = if e.is_timeout() {
                    ProviderErrorKind::Timeout
                } else {
                    ProviderErrorKind::Transport
                };
                // Strip the URL so the API key never leaks into messages
                let transport = e.without_url().to_string();
                return Err(self.failure(operation, kind, None, Some(transport), None, default_message));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body: Option<Value> = response.json().await.ok();
            let provider_message = body.as_ref().and_then(provider_message);
            return Err(self.failure(
                operation,
                ProviderErrorKind::Status,
                Some(status.as_u16()),
                None,
                provider_message,
                default_message,
            ));
        }

        response.json::<Value>().await.map_err(|e| {
            self.failure(
                operation,
                ProviderErrorKind::MalformedBody,
                Some(status.as_u16()),
                Some(e.without_url().to_string()),
                None,
                default_message,
            )
        })
    }

    /// Log the failure and pick the message: provider text, transport text, default
    fn failure(
        &self,
        operation: &str,
        kind: ProviderErrorKind,
        status: Option<u16>,
        transport: Option<String>,
        provider_message: Option<String>,
        default_message: &str,
    ) -> ProviderError {
        tracing::error!(
            "Spoonacular API {} error: status={:?} transport={:?} provider={:?}",
            operation,
            status,
            transport,
            provider_message
        );

        let message = provider_message
            .or_else(|| transport.filter(|t| !t.is_empty()))
            .unwrap_or_else(|| default_message.to_string());

        ProviderError::new(kind, message, status)
    }
}

/// Provider-supplied error text: `message`, then `statusMessage`
fn provider_message(body: &Value) -> Option<String> {
    ["message", "statusMessage"].iter().find_map(|field| {
        body.get(field)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    })
}

fn redacted_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(name, value)| {
            if name == "apiKey" {
                format!("{}=***", name)
            } else {
                format!("{}={}", name, urlencoding::encode(value))
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}
