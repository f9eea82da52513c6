use serde::{Deserialize, Serialize};

/// Placeholder shown for nutrition values the provider did not report
pub const NOT_AVAILABLE: &str = "N/A";

/// Search result card as presented to the user
///
/// `is_favorite` is client-local: it starts out `false` on every transform
/// and is never sent back upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    /// Provider summary, may contain HTML markup
    pub summary: Option<String>,
    pub cuisines: Vec<String>,
    pub diets: Vec<String>,
    pub dish_types: Vec<String>,
    pub is_favorite: bool,
}

/// Full recipe view: the summary fields plus ingredients, steps and nutrition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub summary: RecipeSummary,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<InstructionStep>,
    pub nutrition: Nutrition,
}

impl RecipeDetail {
    pub fn id(&self) -> i64 {
        self.summary.id
    }

    pub fn is_favorite(&self) -> bool {
        self.summary.is_favorite
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Option<i64>,
    pub name: String,
    pub amount: f64,
    pub unit: String,
    /// Human-readable line, e.g. "2 cups all-purpose flour"
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionStep {
    pub number: u32,
    pub text: String,
}

/// Headline nutrients rendered as display strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
}

impl Default for Nutrition {
    fn default() -> Self {
        Self {
            calories: NOT_AVAILABLE.to_string(),
            protein: NOT_AVAILABLE.to_string(),
            carbs: NOT_AVAILABLE.to_string(),
            fat: NOT_AVAILABLE.to_string(),
        }
    }
}
