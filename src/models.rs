//! Domain types for menus, weather readings, and suggestion records.
//!
//! Serde shapes match the JSON contract consumed by the front-end:
//! camelCase field names, lowercase category labels.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The three fixed meal categories every menu is partitioned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Starter,
    Main,
    Dessert,
}

impl Category {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Starter => "starter",
            Category::Main => "main",
            Category::Dessert => "dessert",
        }
    }

    pub const fn all() -> &'static [Category] {
        &[Category::Starter, Category::Main, Category::Dessert]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single dish on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_seasonal_dish: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_weather: Option<Vec<String>>,
}

/// The full set of dishes a restaurant offers, keyed by restaurant name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub restaurant_name: String,
    pub items: Vec<MenuItem>,
}

impl Menu {
    /// All items belonging to the given category, in menu order.
    pub fn items_in(&self, category: Category) -> impl Iterator<Item = &MenuItem> {
        self.items.iter().filter(move |item| item.category == category)
    }
}

/// Normalized snapshot of current conditions at a location.
///
/// Pure value snapshot; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Temperature in whole degrees Celsius, rounded
    pub temperature: i32,
    /// Short condition label, translated for display
    pub condition: String,
    /// Longer human-language description
    pub description: String,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Resolved location name
    pub location: String,
}

/// One selected dish per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSelection {
    pub starter: MenuItem,
    pub main_dish: MenuItem,
    pub dessert: MenuItem,
}

/// Engine output: a meal selection plus the model's rationale.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub selection: MealSelection,
    pub reasoning: String,
}

/// Persisted daily suggestion. Created once per orchestrator run,
/// never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRecord {
    /// Server-local calendar day (`YYYY-MM-DD`), the grouping key
    pub date: NaiveDate,
    pub weather: WeatherReading,
    pub suggestions: MealSelection,
    pub reasoning: String,
    /// Creation instant, the uniqueness key within a day
    pub created_at: DateTime<Utc>,
}

/// Confirmation returned after a successful menu upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub message: String,
    pub restaurant_name: String,
    pub item_count: usize,
}
