//! `MenuAI` - Weather-aware daily menu suggestions
//!
//! This library fetches a restaurant's stored menu, retrieves current weather
//! for its location, asks a language model to pick a starter/main/dessert
//! pairing that fits the conditions, persists the dated result, and serves it
//! over HTTP to a simple front-end display.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod llm;
pub mod models;
pub mod orchestrator;
pub mod store;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::MenuAiConfig;
pub use engine::SuggestionEngine;
pub use error::MenuAiError;
pub use llm::{ChatClient, OpenAiClient};
pub use models::{
    Category, MealSelection, Menu, MenuItem, Suggestion, SuggestionRecord, UploadSummary,
    WeatherReading,
};
pub use orchestrator::Orchestrator;
pub use store::{MenuStore, Storage, SuggestionStore};
pub use weather::{OpenWeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, MenuAiError>;
