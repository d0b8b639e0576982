//! Request orchestration
//!
//! Sequences the collaborators into the two supported operations:
//! producing today's suggestion (menu → weather → model → persist) and
//! accepting an uploaded menu (validate → persist). Suggestion production
//! is split into an effect-free compute stage and a commit stage; commit is
//! the only place a suggestion touches durable storage, and a failed commit
//! does not erase a successfully computed result.

use std::sync::Arc;

use chrono::{Local, Utc};
use tracing::{info, instrument, warn};

use crate::Result;
use crate::config::MenuAiConfig;
use crate::engine::SuggestionEngine;
use crate::error::MenuAiError;
use crate::models::{Menu, SuggestionRecord, UploadSummary};
use crate::store::{MenuStore, SuggestionStore};
use crate::weather::WeatherProvider;

pub struct Orchestrator {
    restaurant_name: String,
    restaurant_location: String,
    menus: Arc<dyn MenuStore>,
    suggestions: Arc<dyn SuggestionStore>,
    weather: Arc<dyn WeatherProvider>,
    engine: SuggestionEngine,
}

impl Orchestrator {
    pub fn new(
        config: &MenuAiConfig,
        menus: Arc<dyn MenuStore>,
        suggestions: Arc<dyn SuggestionStore>,
        weather: Arc<dyn WeatherProvider>,
        engine: SuggestionEngine,
    ) -> Self {
        Self {
            restaurant_name: config.restaurant_name.clone(),
            restaurant_location: config.restaurant_location.clone(),
            menus,
            suggestions,
            weather,
            engine,
        }
    }

    /// Produce and persist today's suggestion.
    ///
    /// The record is returned even when persistence fails; the failure is
    /// logged and the caller keeps the computed answer.
    #[instrument(skip(self), fields(restaurant = %self.restaurant_name))]
    pub async fn produce_daily_suggestion(&self) -> Result<SuggestionRecord> {
        let record = self.compute().await?;
        self.commit(&record).await;
        Ok(record)
    }

    /// Compute stage: strictly sequential, no writes.
    ///
    /// A missing menu short-circuits before any weather or model call.
    async fn compute(&self) -> Result<SuggestionRecord> {
        info!("Fetching menu for restaurant: {}", self.restaurant_name);
        let menu = self
            .menus
            .get(&self.restaurant_name)
            .await?
            .ok_or_else(|| {
                MenuAiError::not_found(format!(
                    "Menu not found for restaurant: {}",
                    self.restaurant_name
                ))
            })?;

        info!("Fetching weather for location: {}", self.restaurant_location);
        let weather = self.weather.current_weather(&self.restaurant_location).await?;

        info!("Generating menu suggestion");
        let suggestion = self.engine.suggest(&menu, &weather).await?;

        Ok(SuggestionRecord {
            date: Local::now().date_naive(),
            weather,
            suggestions: suggestion.selection,
            reasoning: suggestion.reasoning,
            created_at: Utc::now(),
        })
    }

    /// Commit stage: the only write in the suggestion flow.
    async fn commit(&self, record: &SuggestionRecord) {
        if let Err(err) = self.suggestions.insert(record).await {
            warn!("Failed to persist suggestion record: {err}");
        }
    }

    /// Validate and persist an uploaded menu (create-or-replace).
    #[instrument(skip(self, menu), fields(restaurant = %menu.restaurant_name))]
    pub async fn accept_menu(&self, menu: Menu) -> Result<UploadSummary> {
        if menu.restaurant_name.trim().is_empty() || menu.items.is_empty() {
            return Err(MenuAiError::validation(
                "Invalid menu format. Required: restaurantName and items array",
            ));
        }

        let item_count = menu.items.len();
        self.menus.put(&menu).await?;

        info!(
            "Menu uploaded successfully for restaurant: {}",
            menu.restaurant_name
        );

        Ok(UploadSummary {
            message: "Menu uploaded successfully".to_string(),
            restaurant_name: menu.restaurant_name,
            item_count,
        })
    }
}
