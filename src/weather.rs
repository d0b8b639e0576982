//! Weather client for OpenWeatherMap
//!
//! Performs a single bounded outbound call per reading and normalizes the
//! response into a [`WeatherReading`], translating the condition label for
//! display. Any transport failure or non-success status surfaces as an
//! upstream error carrying the underlying cause.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::Result;
use crate::config::MenuAiConfig;
use crate::error::MenuAiError;
use crate::models::WeatherReading;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Every outbound weather call is bounded by this timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Spanish display labels for OpenWeatherMap condition groups.
/// Lookup is total: unmapped labels pass through untranslated.
const CONDITION_TRANSLATIONS: &[(&str, &str)] = &[
    ("Clear", "Despejado"),
    ("Clouds", "Nublado"),
    ("Rain", "Lluvia"),
    ("Drizzle", "Llovizna"),
    ("Thunderstorm", "Tormenta"),
    ("Snow", "Nieve"),
    ("Mist", "Neblina"),
    ("Smoke", "Humo"),
    ("Haze", "Bruma"),
    ("Dust", "Polvo"),
    ("Fog", "Niebla"),
    ("Sand", "Arena"),
    ("Ash", "Ceniza"),
    ("Squall", "Turbonada"),
    ("Tornado", "Tornado"),
];

/// Translate an OpenWeatherMap condition label, falling back to the
/// untranslated label when no mapping exists.
#[must_use]
pub fn translate_condition(condition: &str) -> &str {
    CONDITION_TRANSLATIONS
        .iter()
        .find(|(from, _)| *from == condition)
        .map_or(condition, |(_, to)| *to)
}

/// Source of current weather readings, abstracted for injected fakes.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current weather for a location name (e.g. a city).
    async fn current_weather(&self, location: &str) -> Result<WeatherReading>;
}

/// OpenWeatherMap-backed [`WeatherProvider`].
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(config: &MenuAiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("MenuAI/0.1.0")
            .build()
            .map_err(|e| MenuAiError::upstream(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            api_key: config.weather_api_key.clone(),
            base_url: config.weather_base_url.clone(),
            http,
        })
    }

    /// Current weather for an explicit coordinate pair.
    #[instrument(skip(self))]
    pub async fn current_by_coordinates(&self, lat: f64, lon: f64) -> Result<WeatherReading> {
        let (lat, lon) = (lat.to_string(), lon.to_string());
        self.fetch(&[("lat", lat.as_str()), ("lon", lon.as_str())])
            .await
    }

    async fn fetch(&self, place: &[(&str, &str)]) -> Result<WeatherReading> {
        let mut query: Vec<(&str, &str)> = place.to_vec();
        query.extend([
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
            ("lang", "es"),
        ]);

        let res = self
            .http
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| MenuAiError::upstream(format!("Failed to fetch weather data: {e}")))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            MenuAiError::upstream(format!("Failed to read weather response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(MenuAiError::upstream(format!(
                "Weather request failed with status {status}: {}",
                truncate_body(&body)
            )));
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| MenuAiError::upstream(format!("Failed to parse weather JSON: {e}")))?;

        let summary = parsed
            .weather
            .first()
            .ok_or_else(|| MenuAiError::upstream("Weather response contained no conditions"))?;

        debug!(
            "Weather for {}: {:.1}°C, {}",
            parsed.name, parsed.main.temp, summary.main
        );

        Ok(WeatherReading {
            temperature: parsed.main.temp.round() as i32,
            condition: translate_condition(&summary.main).to_string(),
            description: summary.description.clone(),
            humidity: parsed.main.humidity,
            location: parsed.name.clone(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn current_weather(&self, location: &str) -> Result<WeatherReading> {
        self.fetch(&[("q", location)]).await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    // Cut on a char boundary so multibyte error bodies cannot panic the slice.
    let mut cut = MAX;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &body[..cut])
}
