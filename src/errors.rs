use crate::models::FieldErrors;
use axum::{http::StatusCode, Json};
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub fields: Option<FieldErrors>,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            fields: None,
        }
    }

    pub fn invalid_fields(fields: FieldErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "workout could not be saved".to_string(),
            fields: Some(fields),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self.fields {
            Some(fields) => (
                self.status,
                Json(serde_json::json!({ "message": self.message, "fields": fields })),
            )
                .into_response(),
            None => (self.status, self.message).into_response(),
        }
    }
}

/// Failures talking to the durable slot. The store recovers from all of them.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
    #[error("stored workouts are corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("failed to encode workouts: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("storage is disabled")]
    Disabled,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),
    #[error("APP_STORAGE must be one of file, memory, disabled; got {0:?}")]
    InvalidStorage(String),
}
