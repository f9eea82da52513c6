use crate::core::instructions::parse_html_instructions;
use crate::models::{
    Ingredient, InstructionStep, Nutrition, ProviderIngredient, ProviderNutrient, ProviderRecipe, RecipeDetail,
    RecipeSummary, NOT_AVAILABLE,
};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Unexpected recipe shape: {0}")]
    InvalidRecipe(#[from] serde_json::Error),
}

/// Turn a `complexSearch` body into result cards.
///
/// A missing `results` array yields no cards; entries that cannot be read
/// (e.g. no `id`) are skipped.
pub fn transform_search_response(body: &Value) -> Vec<RecipeSummary> {
    let results = match body.get("results").and_then(Value::as_array) {
        Some(results) => results,
        None => return Vec::new(),
    };

    results
        .iter()
        .filter_map(|entry| match serde_json::from_value::<ProviderRecipe>(entry.clone()) {
            Ok(recipe) => Some(summary_from(&recipe)),
            Err(e) => {
                tracing::warn!("Skipping unreadable search result: {}", e);
                None
            }
        })
        .collect()
}

/// Turn an `/information` body into the detail view.
///
/// `is_favorite` carries over the flag from the matching result card.
pub fn transform_detail(body: &Value, is_favorite: bool) -> Result<RecipeDetail, TransformError> {
    let recipe: ProviderRecipe = serde_json::from_value(body.clone())?;

    let mut summary = summary_from(&recipe);
    summary.is_favorite = is_favorite;

    Ok(RecipeDetail {
        summary,
        ingredients: recipe.extended_ingredients.iter().map(ingredient_from).collect(),
        instructions: instruction_steps(&recipe),
        nutrition: extract_nutrition(recipe.nutrition.as_ref().map(|n| n.nutrients.as_slice())),
    })
}

fn summary_from(recipe: &ProviderRecipe) -> RecipeSummary {
    RecipeSummary {
        id: recipe.id,
        title: recipe.title.clone().unwrap_or_default(),
        image: recipe.image.clone(),
        ready_in_minutes: recipe.ready_in_minutes,
        servings: recipe.servings,
        summary: recipe.summary.clone(),
        cuisines: recipe.cuisines.clone(),
        diets: recipe.diets.clone(),
        dish_types: recipe.dish_types.clone(),
        is_favorite: false,
    }
}

fn ingredient_from(raw: &ProviderIngredient) -> Ingredient {
    let name = raw.name.clone().unwrap_or_default();
    let amount = raw.amount.unwrap_or(0.0);
    let unit = raw.unit.clone().unwrap_or_default();

    let display = match raw.original.as_deref().map(str::trim) {
        Some(original) if !original.is_empty() => original.to_string(),
        _ => [format_amount(amount), unit.clone(), name.clone()]
            .iter()
            .filter(|part| !part.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" "),
    };

    Ingredient {
        id: raw.id,
        name,
        amount,
        unit,
        display,
    }
}

/// Steps from the first structured instruction block, else parsed from the HTML blob
pub fn instruction_steps(recipe: &ProviderRecipe) -> Vec<InstructionStep> {
    let structured: Vec<InstructionStep> = recipe
        .analyzed_instructions
        .first()
        .map(|block| block.steps.as_slice())
        .unwrap_or_default()
        .iter()
        .filter_map(|step| {
            let text = step.step.as_deref().map(str::trim).filter(|text| !text.is_empty())?;
            Some((step.number, text.to_string()))
        })
        .zip(1..)
        .map(|((number, text), position)| InstructionStep {
            number: number.unwrap_or(position),
            text,
        })
        .collect();

    if !structured.is_empty() {
        return structured;
    }

    match recipe.instructions.as_deref() {
        Some(html) if !html.trim().is_empty() => parse_html_instructions(html)
            .into_iter()
            .zip(1..)
            .map(|(text, number)| InstructionStep { number, text })
            .collect(),
        _ => Vec::new(),
    }
}

/// Pick Calories, Protein, Carbohydrates and Fat by exact name
pub fn extract_nutrition(nutrients: Option<&[ProviderNutrient]>) -> Nutrition {
    let nutrients = match nutrients {
        Some(nutrients) => nutrients,
        None => return Nutrition::default(),
    };

    let lookup = |name: &str| {
        nutrients
            .iter()
            .find(|n| n.name.as_deref() == Some(name))
            .and_then(|n| n.amount)
            .filter(|amount| *amount != 0.0)
            .map(format_amount)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    Nutrition {
        calories: lookup("Calories"),
        protein: lookup("Protein"),
        carbs: lookup("Carbohydrates"),
        fat: lookup("Fat"),
    }
}

/// Render a quantity without a trailing `.0` for whole numbers
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}
