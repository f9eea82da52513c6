// Route exports
pub mod recipes;

use crate::models::ErrorResponse;
use crate::services::ProviderError;
use actix_cors::Cors;
use actix_web::{error, http::header, http::StatusCode, web, HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;

/// Failures rendered as `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("Query parameter is required")]
    MissingQuery,

    #[error("Valid recipe ID is required")]
    InvalidRecipeId,

    #[error("Not found")]
    NotFound,

    #[error("Invalid query: {0}")]
    InvalidQueryString(String),

    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingQuery | ApiError::InvalidRecipeId | ApiError::InvalidQueryString(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MissingApiKey | ApiError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    ApiError::InvalidQueryString(err.to_string()).into()
}

/// CORS policy: any origin, GET/OPTIONS, Content-Type
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(vec!["GET", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .configure(recipes::configure)
            .default_service(web::to(not_found)),
    );
}

async fn not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    tracing::info!("No API route for {} {}", req.method(), req.path());
    Err(ApiError::NotFound)
}
