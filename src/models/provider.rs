//! Wire shapes of the Spoonacular JSON payloads.
//!
//! Every field the provider may omit or send as `null` is optional here; list
//! fields collapse `null` into an empty vector so downstream code never has to
//! distinguish the two.

use serde::{Deserialize, Deserializer};

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A recipe as returned by `complexSearch` results or `/{id}/information`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecipe {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cuisines: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub diets: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dish_types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub extended_ingredients: Vec<ProviderIngredient>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub analyzed_instructions: Vec<ProviderInstructionBlock>,
    /// Free-form instructions, usually HTML
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub nutrition: Option<ProviderNutrition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderIngredient {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub original: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderInstructionBlock {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub steps: Vec<ProviderStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderStep {
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub step: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderNutrition {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nutrients: Vec<ProviderNutrient>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderNutrient {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}
