use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::{Validate, ValidationError};

/// Query string of `GET /api/recipes/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub query: String,
    pub diet: Option<String>,
    pub cuisine: Option<String>,
    pub intolerances: Option<String>,
    #[serde(rename = "type")]
    pub dish_type: Option<String>,
    pub max_ready_time: Option<String>,
    /// Any other query parameter, forwarded to the provider as-is
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

impl SearchParams {
    /// Split into the search term and the filters to forward upstream.
    /// Empty values are dropped, as if they had not been sent.
    pub fn into_parts(self) -> (String, SearchFilters) {
        let filters = SearchFilters {
            diet: non_empty(self.diet),
            cuisine: non_empty(self.cuisine),
            intolerances: non_empty(self.intolerances),
            dish_type: non_empty(self.dish_type),
            max_ready_time: non_empty(self.max_ready_time).map(|raw| ReadyTime::parse(&raw)),
            number: None,
            extra: self.extra.into_iter().filter(|(_, value)| !value.is_empty()).collect(),
        };

        (self.query, filters)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Maximum preparation time filter
///
/// Values that do not parse as an integer are kept verbatim and forwarded
/// unchanged, leaving the provider to decide what to do with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadyTime {
    Minutes(i64),
    Unparsed(String),
}

impl ReadyTime {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(minutes) => ReadyTime::Minutes(minutes),
            Err(_) => ReadyTime::Unparsed(raw.to_string()),
        }
    }
}

impl fmt::Display for ReadyTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadyTime::Minutes(minutes) => write!(f, "{}", minutes),
            ReadyTime::Unparsed(raw) => f.write_str(raw),
        }
    }
}

/// Filters the UI knows about by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Diet,
    Cuisine,
    Intolerances,
    DishType,
    MaxReadyTime,
}

impl FilterKey {
    pub const ALL: [FilterKey; 5] = [
        FilterKey::Diet,
        FilterKey::Cuisine,
        FilterKey::Intolerances,
        FilterKey::DishType,
        FilterKey::MaxReadyTime,
    ];

    /// Parameter name used by both the proxy and Spoonacular
    pub fn param_name(&self) -> &'static str {
        match self {
            FilterKey::Diet => "diet",
            FilterKey::Cuisine => "cuisine",
            FilterKey::Intolerances => "intolerances",
            FilterKey::DishType => "type",
            FilterKey::MaxReadyTime => "maxReadyTime",
        }
    }

    pub fn from_param_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.param_name() == name)
    }
}

/// Sparse set of search filters
///
/// Known filters have named fields. Anything else lands in `extra` and is
/// forwarded to the provider untouched, so new provider filters work without
/// a code change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchFilters {
    pub diet: Option<String>,
    pub cuisine: Option<String>,
    pub intolerances: Option<String>,
    pub dish_type: Option<String>,
    pub max_ready_time: Option<ReadyTime>,
    /// Page size override; the provider client falls back to its default
    pub number: Option<u32>,
    pub extra: BTreeMap<String, String>,
}

impl SearchFilters {
    pub fn get(&self, key: FilterKey) -> Option<String> {
        match key {
            FilterKey::Diet => self.diet.clone(),
            FilterKey::Cuisine => self.cuisine.clone(),
            FilterKey::Intolerances => self.intolerances.clone(),
            FilterKey::DishType => self.dish_type.clone(),
            FilterKey::MaxReadyTime => self.max_ready_time.as_ref().map(ToString::to_string),
        }
    }

    /// Set or clear one named filter. Empty strings clear it.
    pub fn set(&mut self, key: FilterKey, value: Option<String>) {
        let value = non_empty(value);
        match key {
            FilterKey::Diet => self.diet = value,
            FilterKey::Cuisine => self.cuisine = value,
            FilterKey::Intolerances => self.intolerances = value,
            FilterKey::DishType => self.dish_type = value,
            FilterKey::MaxReadyTime => self.max_ready_time = value.map(|raw| ReadyTime::parse(&raw)),
        }
    }

    /// Set a filter by its parameter name, routing unknown names to `extra`
    pub fn set_param(&mut self, name: &str, value: Option<String>) {
        match FilterKey::from_param_name(name) {
            Some(key) => self.set(key, value),
            None => match non_empty(value) {
                Some(value) => {
                    self.extra.insert(name.to_string(), value);
                }
                None => {
                    self.extra.remove(name);
                }
            },
        }
    }

    pub fn clear(&mut self) {
        *self = SearchFilters::default();
    }

    pub fn has_active(&self) -> bool {
        FilterKey::ALL.iter().any(|key| self.get(*key).is_some()) || !self.extra.is_empty()
    }

    /// Named filters as `(param, value)` pairs, in a stable order
    pub fn named_pairs(&self) -> Vec<(&'static str, String)> {
        FilterKey::ALL
            .iter()
            .filter_map(|key| self.get(*key).map(|value| (key.param_name(), value)))
            .collect()
    }

    /// Every filter as `(param, value)` pairs: named ones, the page size, then pass-through keys
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .named_pairs()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();

        if let Some(number) = self.number {
            pairs.push(("number".to_string(), number.to_string()));
        }
        pairs.extend(self.extra.iter().map(|(name, value)| (name.clone(), value.clone())));
        pairs
    }

    /// Active named filters with the label shown on a filter chip
    pub fn active_labels(&self) -> Vec<(FilterKey, String)> {
        FilterKey::ALL
            .iter()
            .filter_map(|key| {
                self.get(*key).map(|value| {
                    let label = match key {
                        FilterKey::MaxReadyTime => format!("≤{} min", value),
                        _ => value,
                    };
                    (*key, label)
                })
            })
            .collect()
    }
}
