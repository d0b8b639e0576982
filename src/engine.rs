//! Suggestion engine
//!
//! Translates a (menu, weather) pair into a [`Suggestion`] through a single
//! delegated model call. The engine validates that every category has at
//! least one item before asking the model, constrains the reply to a fixed
//! JSON shape, and resolves every returned dish name back to the menu by
//! exact match within its category. Resolution is fail-closed: an unknown
//! name is an error, never a silent substitution.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::Deserialize;
use tracing::instrument;

use crate::Result;
use crate::error::MenuAiError;
use crate::llm::ChatClient;
use crate::models::{Category, MealSelection, Menu, MenuItem, Suggestion, WeatherReading};

const SYSTEM_PROMPT: &str = "You are a helpful restaurant menu curator who suggests dishes \
based on weather conditions. Always respond with valid JSON.";

/// Picks one dish per category for the day's weather.
pub struct SuggestionEngine {
    chat: Arc<dyn ChatClient>,
}

/// Fixed reply shape required from the model.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelReply {
    starter: String,
    main_dish: String,
    dessert: String,
    reasoning: String,
}

impl SuggestionEngine {
    pub fn new(chat: Arc<dyn ChatClient>) -> Self {
        Self { chat }
    }

    #[instrument(skip_all, fields(restaurant = %menu.restaurant_name, condition = %weather.condition))]
    pub async fn suggest(&self, menu: &Menu, weather: &WeatherReading) -> Result<Suggestion> {
        let partitioned = PartitionedMenu::from_menu(menu)?;
        let prompt = build_prompt(&partitioned, weather);

        let reply = self.chat.complete(SYSTEM_PROMPT, &prompt).await?;
        let reply: ModelReply = serde_json::from_str(&reply).map_err(|e| {
            MenuAiError::model_output(format!("Model reply is not the expected JSON shape: {e}"))
        })?;

        let selection = MealSelection {
            starter: resolve(&partitioned.starters, &reply.starter, Category::Starter)?,
            main_dish: resolve(&partitioned.mains, &reply.main_dish, Category::Main)?,
            dessert: resolve(&partitioned.desserts, &reply.dessert, Category::Dessert)?,
        };

        Ok(Suggestion {
            selection,
            reasoning: reply.reasoning,
        })
    }
}

/// Menu items split into the three fixed categories, each non-empty.
struct PartitionedMenu<'a> {
    starters: Vec<&'a MenuItem>,
    mains: Vec<&'a MenuItem>,
    desserts: Vec<&'a MenuItem>,
}

impl<'a> PartitionedMenu<'a> {
    fn from_menu(menu: &'a Menu) -> Result<Self> {
        let partitioned = Self {
            starters: menu.items_in(Category::Starter).collect(),
            mains: menu.items_in(Category::Main).collect(),
            desserts: menu.items_in(Category::Dessert).collect(),
        };

        for category in Category::all() {
            if partitioned.items_for(*category).is_empty() {
                return Err(MenuAiError::menu_data(format!(
                    "Menu for '{}' has no items in category '{category}'",
                    menu.restaurant_name
                )));
            }
        }

        Ok(partitioned)
    }

    fn items_for(&self, category: Category) -> &[&'a MenuItem] {
        match category {
            Category::Starter => &self.starters,
            Category::Main => &self.mains,
            Category::Dessert => &self.desserts,
        }
    }
}

/// Exact, case-sensitive name match within the matching category only.
fn resolve(candidates: &[&MenuItem], name: &str, category: Category) -> Result<MenuItem> {
    candidates
        .iter()
        .find(|item| item.name == name)
        .map(|item| (*item).clone())
        .ok_or_else(|| {
            MenuAiError::model_output(format!(
                "Model suggested a {category} not present on the menu: '{name}'"
            ))
        })
}

fn build_prompt(menu: &PartitionedMenu<'_>, weather: &WeatherReading) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a restaurant menu curator. Based on the current weather conditions and the \
         available menu items, suggest one starter, one main dish, and one dessert for a \
         complete meal.\n\n",
    );

    let _ = write!(
        prompt,
        "Weather Information:\n\
         - Temperature: {}°C\n\
         - Condition: {}\n\
         - Description: {}\n\
         - Humidity: {}%\n\
         - Location: {}\n\n",
        weather.temperature,
        weather.condition,
        weather.description,
        weather.humidity,
        weather.location
    );

    prompt.push_str("Available Menu Items:\n\n");
    push_category(&mut prompt, "Starters", &menu.starters);
    push_category(&mut prompt, "Main Dishes", &menu.mains);
    push_category(&mut prompt, "Desserts", &menu.desserts);

    prompt.push_str(
        "Please respond in the following JSON format:\n\
         {\n\
         \x20 \"starter\": \"name of the starter\",\n\
         \x20 \"mainDish\": \"name of the main dish\",\n\
         \x20 \"dessert\": \"name of the dessert\",\n\
         \x20 \"reasoning\": \"Brief explanation of why these dishes pair well with today's \
         weather (2-3 sentences)\"\n\
         }\n\n\
         Consider factors like:\n\
         - Hot weather → lighter, refreshing dishes and cold/frozen desserts\n\
         - Cold weather → hearty, warming dishes and warm/creamy desserts\n\
         - Rainy weather → comfort food\n\
         - Clear weather → fresh, vibrant options",
    );

    prompt
}

fn push_category(prompt: &mut String, heading: &str, items: &[&MenuItem]) {
    let _ = writeln!(prompt, "{heading}:");
    for item in items {
        let _ = writeln!(
            prompt,
            "- {}: {} (Ingredients: {})",
            item.name,
            item.description,
            item.ingredients.join(", ")
        );
    }
    prompt.push('\n');
}
