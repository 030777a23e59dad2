//! Error handling for the Sugarcane Yield Predictor
//!
//! Two families: [`StartupError`] halts the process before the server binds,
//! [`AppError`] is scoped to one request and rendered as a JSON error body.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::inference::PredictionError;

/// Errors that prevent the form from ever being served
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Secrets file not found at {}", path.display())]
    ConfigurationMissing { path: PathBuf },

    #[error("Key '{key}' not found in secrets")]
    ConfigurationKeyMissing { key: String },

    #[error("Invalid secrets file: {0}")]
    ConfigurationInvalid(String),

    #[error("Model file not found at: {}", path.display())]
    ArtifactMissing { path: PathBuf },

    #[error("Invalid model artifact {}: {reason}", path.display())]
    ArtifactInvalid { path: PathBuf, reason: String },

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unknown taluka: {0}")]
    UnknownLocation(String),

    #[error("Prediction failed: {0}")]
    Prediction(#[from] PredictionError),

    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnknownLocation(_) => StatusCode::NOT_FOUND,
            AppError::Prediction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::UnknownLocation(_) => "UNKNOWN_LOCATION",
            AppError::Prediction(_) => "PREDICTION_FAILED",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_detail = match &self {
            AppError::UnknownLocation(taluka) => ErrorDetail {
                code: self.code().to_string(),
                message: format!("Taluka '{}' is not in the weather table", taluka),
                field: Some("taluka".to_string()),
            },
            AppError::Prediction(e) => ErrorDetail {
                code: self.code().to_string(),
                message: format!("Prediction failed: {}", e),
                field: None,
            },
            AppError::Validation { field, message } => ErrorDetail {
                code: self.code().to_string(),
                message: message.clone(),
                field: Some(field.clone()),
            },
            AppError::Internal(_) => ErrorDetail {
                code: self.code().to_string(),
                message: "An internal server error occurred".to_string(),
                field: None,
            },
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Request failed: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
