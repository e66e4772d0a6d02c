//! API error type. Every handler and store function returns [`Result`], and
//! the [`IntoResponse`] impl decides the status code and JSON body.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input. Rendered as `{"<field>": ["<message>"]}`.
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{0}")]
    NotFound(String),

    /// Unique constraint could not be satisfied (txid generation exhausted).
    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> serde_json::Value {
        match self {
            ApiError::Validation { field, message } => {
                let mut errors = serde_json::Map::new();
                errors.insert(field.clone(), json!([message]));
                serde_json::Value::Object(errors)
            }
            ApiError::NotFound(message) | ApiError::Conflict(message) => {
                json!({ "detail": message })
            }
            ApiError::Database(_) => json!({ "detail": "Internal server error" }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Database(e) => tracing::error!("Database error: {:?}", e),
            ApiError::Conflict(message) => tracing::warn!("Conflict: {}", message),
            _ => tracing::debug!("Request rejected: {}", self),
        }
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation("non_field_errors", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation("non_field_errors", rejection.body_text())
    }
}
