//! Configuration management for the MenuAI service
//!
//! All configuration comes from environment variables, read once at process
//! start. The resulting value is passed by reference into each collaborator's
//! constructor so business logic never touches ambient global state.

use std::env;
use std::path::PathBuf;

use crate::Result;
use crate::error::MenuAiError;

pub const DEFAULT_RESTAURANT_NAME: &str = "default";
pub const DEFAULT_RESTAURANT_LOCATION: &str = "Córdoba";
pub const DEFAULT_DATA_DIR: &str = "menuai_data";
pub const DEFAULT_PORT: u16 = 8080;

/// Process-wide configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct MenuAiConfig {
    /// API key for the model provider
    pub openai_api_key: String,
    /// API key for OpenWeatherMap
    pub weather_api_key: String,
    /// Restaurant identifier used as the menu key
    pub restaurant_name: String,
    /// Location string passed to the weather API
    pub restaurant_location: String,
    /// Directory backing the menu and suggestion tables
    pub data_dir: PathBuf,
    /// HTTP listen port
    pub port: u16,
    /// Weather API base URL, overridable for tests and gateways
    pub weather_base_url: String,
    /// Model API base URL, overridable for tests and gateways
    pub openai_base_url: String,
}

impl MenuAiConfig {
    /// Load configuration from the environment.
    ///
    /// Missing required values fail fast here, before any network call is made.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            openai_api_key: require("OPENAI_API_KEY")?,
            weather_api_key: require("WEATHER_API_KEY")?,
            restaurant_name: var_or("RESTAURANT_NAME", DEFAULT_RESTAURANT_NAME),
            restaurant_location: var_or("RESTAURANT_LOCATION", DEFAULT_RESTAURANT_LOCATION),
            data_dir: PathBuf::from(var_or("MENUAI_DATA_DIR", DEFAULT_DATA_DIR)),
            port: parse_port()?,
            weather_base_url: var_or("MENUAI_WEATHER_BASE_URL", crate::weather::DEFAULT_BASE_URL),
            openai_base_url: var_or("MENUAI_OPENAI_BASE_URL", crate::llm::DEFAULT_BASE_URL),
        })
    }
}

fn require(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(MenuAiError::config(format!(
            "Missing required environment variable: {name}"
        ))),
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).ok().filter(|v| !v.is_empty()).unwrap_or_else(|| default.to_string())
}

fn parse_port() -> Result<u16> {
    match env::var("MENUAI_PORT") {
        Ok(raw) => raw.parse().map_err(|_| {
            MenuAiError::config(format!("MENUAI_PORT is not a valid port number: {raw}"))
        }),
        Err(_) => Ok(DEFAULT_PORT),
    }
}
