use actix_web::{http::header, web, HttpRequest, HttpResponse, Responder};
use serde_json::Value;
use validator::Validate;
use crate::models::{HealthResponse, SearchParams};
use crate::routes::ApiError;
use crate::services::SpoonacularClient;
use std::sync::Arc;

/// Application state shared across all handlers
///
/// `spoonacular` is `None` when no API key is configured; every proxy call
/// then answers 500 without reaching the provider.
#[derive(Clone)]
pub struct AppState {
    pub spoonacular: Option<Arc<SpoonacularClient>>,
}

impl AppState {
    fn provider(&self) -> Result<&SpoonacularClient, ApiError> {
        self.spoonacular.as_deref().ok_or(ApiError::MissingApiKey)
    }
}

/// Configure all recipe routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/recipes/search", web::get().to(search_recipes))
        .route("/recipe/{id}", web::get().to(recipe_details));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        provider_configured: state.spoonacular.is_some(),
    })
}

/// Provider JSON passed through with permissive CORS headers
fn proxied(body: Value) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
        .json(body)
}

/// Search recipes
///
/// GET /api/recipes/search?query=pasta&diet=vegan&cuisine=italian&intolerances=gluten&type=dinner&maxReadyTime=30
async fn search_recipes(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let spoonacular = state.provider()?;

    tracing::info!("Search request received: {} {}", req.method(), req.uri());

    let params = params.into_inner();
    if let Err(errors) = params.validate() {
        tracing::info!("Missing query parameter: {:?} ({})", params.query, errors);
        return Err(ApiError::MissingQuery);
    }

    let (query, filters) = params.into_parts();
    tracing::debug!("Parsed parameters: query={:?}, filters={:?}", query, filters);

    let results = spoonacular.search_recipes(&query, &filters).await.map_err(|e| {
        tracing::error!("Error in recipes search for {:?}: {}", query, e);
        ApiError::from(e)
    })?;

    Ok(proxied(results))
}

/// Recipe details
///
/// GET /api/recipe/{id}
async fn recipe_details(
    state: web::Data<AppState>,
    id: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let spoonacular = state.provider()?;

    tracing::info!("Recipe details request received: {} {}", req.method(), req.uri());

    let id = match id.parse::<i64>() {
        Ok(id) => id,
        Err(_) => {
            tracing::info!("Invalid recipe ID: {:?}", id.as_str());
            return Err(ApiError::InvalidRecipeId);
        }
    };

    tracing::debug!("Fetching recipe details for ID: {}", id);

    let recipe = spoonacular.get_recipe_details(id).await.map_err(|e| {
        tracing::error!("Error in recipe details for {}: {}", id, e);
        ApiError::from(e)
    })?;

    Ok(proxied(recipe))
}
