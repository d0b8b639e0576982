use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use menuai::api::AppState;
use menuai::{
    MenuAiConfig, OpenAiClient, OpenWeatherClient, Orchestrator, Storage, SuggestionEngine, web,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Fail fast on missing configuration, before any network call.
    let config = MenuAiConfig::from_env().context("Failed to load configuration")?;

    let storage = Storage::open(&config.data_dir)
        .with_context(|| format!("Failed to open storage at {}", config.data_dir.display()))?;

    let weather = Arc::new(OpenWeatherClient::new(&config)?);
    let chat = Arc::new(OpenAiClient::new(&config)?);
    let engine = SuggestionEngine::new(chat);

    let orchestrator = Orchestrator::new(
        &config,
        Arc::new(storage.menu_store()),
        Arc::new(storage.suggestion_store()),
        weather,
        engine,
    );

    let state = AppState {
        orchestrator: Arc::new(orchestrator),
    };

    web::run(state, config.port).await
}
