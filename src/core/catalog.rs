//! Filter choices offered to the user.

pub const DIET_OPTIONS: [&str; 6] = ["Vegetarian", "Vegan", "Gluten Free", "Ketogenic", "Paleo", "Pescetarian"];

pub const CUISINE_OPTIONS: [&str; 8] = [
    "Italian",
    "Mexican",
    "Asian",
    "American",
    "Mediterranean",
    "Indian",
    "French",
    "Thai",
];

pub const MEAL_TYPES: [&str; 6] = ["Breakfast", "Lunch", "Dinner", "Dessert", "Snack", "Appetizer"];

/// A ready-time bucket; `minutes: None` means no limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyTimeOption {
    pub label: &'static str,
    pub minutes: Option<u32>,
}

pub const TIME_OPTIONS: [ReadyTimeOption; 3] = [
    ReadyTimeOption { label: "Quick (≤30 min)", minutes: Some(30) },
    ReadyTimeOption { label: "Medium (≤60 min)", minutes: Some(60) },
    ReadyTimeOption { label: "Any time", minutes: None },
];

impl ReadyTimeOption {
    /// Filter value to store when this bucket is picked
    pub fn filter_value(&self) -> Option<String> {
        self.minutes.map(|m| m.to_string())
    }
}
