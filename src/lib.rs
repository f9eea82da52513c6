//! Recipe Finder - recipe search proxy and client data layer
//!
//! The proxy exposes two endpoints that forward to the Spoonacular recipe API
//! while keeping the API key server-side. The client side turns proxy
//! responses into view models and holds the per-session UI state.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{SearchSession, Phase, Notification};
pub use models::{RecipeSummary, RecipeDetail, SearchFilters, SearchParams, ErrorResponse};
pub use services::{ProxyClient, SpoonacularClient, ProviderError, ClientError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let session = SearchSession::new();
        assert_eq!(session.phase(), Phase::Idle);
    }
}
