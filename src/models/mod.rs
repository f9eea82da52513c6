// Model exports
pub mod domain;
pub mod provider;
pub mod requests;
pub mod responses;

pub use domain::{RecipeSummary, RecipeDetail, Ingredient, InstructionStep, Nutrition, NOT_AVAILABLE};
pub use provider::{ProviderRecipe, ProviderIngredient, ProviderInstructionBlock, ProviderStep, ProviderNutrition, ProviderNutrient};
pub use requests::{SearchParams, SearchFilters, FilterKey, ReadyTime};
pub use responses::{ErrorResponse, HealthResponse};
