//! HTTP API routes
//!
//! `GET /getSuggestion` returns today's suggestion record; `POST /uploadMenu`
//! accepts a JSON menu. Error bodies are `{"error": "..."}` with the status
//! mapping defined on [`MenuAiError`].

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};

use crate::error::MenuAiError;
use crate::models::{Menu, SuggestionRecord, UploadSummary};
use crate::orchestrator::Orchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/getSuggestion", get(get_suggestion))
        .route("/uploadMenu", post(upload_menu))
        .with_state(state)
}

async fn get_suggestion(
    State(state): State<AppState>,
) -> Result<Json<SuggestionRecord>, MenuAiError> {
    let record = state.orchestrator.produce_daily_suggestion().await?;
    Ok(Json(record))
}

// The body is decoded by hand so a malformed payload maps to the same 400
// validation error as a structurally empty one.
async fn upload_menu(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<UploadSummary>, MenuAiError> {
    let menu: Menu = serde_json::from_str(&body)
        .map_err(|e| MenuAiError::validation(format!("Invalid menu format: {e}")))?;

    let summary = state.orchestrator.accept_menu(menu).await?;
    Ok(Json(summary))
}
