//! Error types and handling for the MenuAI service

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Main error type for the MenuAI service
#[derive(Error, Debug)]
pub enum MenuAiError {
    /// Malformed or missing request payload
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A referenced entity does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Weather or model API unreachable or returned a non-success response
    #[error("Upstream service unavailable: {message}")]
    Upstream { message: String },

    /// Model reply failed to parse or referenced unknown menu items
    #[error("Invalid model output: {message}")]
    ModelOutput { message: String },

    /// Stored menu data cannot support a suggestion (e.g. an empty category)
    #[error("Menu data error: {message}")]
    MenuData { message: String },

    /// Store read or write failed
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    /// Required configuration value absent or invalid
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl MenuAiError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a new model-output error
    pub fn model_output<S: Into<String>>(message: S) -> Self {
        Self::ModelOutput {
            message: message.into(),
        }
    }

    /// Create a new menu-data error
    pub fn menu_data<S: Into<String>>(message: S) -> Self {
        Self::MenuData {
            message: message.into(),
        }
    }

    /// Create a new persistence error
    pub fn persistence<S: Into<String>>(message: S) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status this error maps to. Validation failures are the caller's
    /// fault (400), a missing menu is 404, everything else is a server-side
    /// failure (500).
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            MenuAiError::Validation { .. } => StatusCode::BAD_REQUEST,
            MenuAiError::NotFound { .. } => StatusCode::NOT_FOUND,
            MenuAiError::Upstream { .. }
            | MenuAiError::ModelOutput { .. }
            | MenuAiError::MenuData { .. }
            | MenuAiError::Persistence { .. }
            | MenuAiError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MenuAiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
