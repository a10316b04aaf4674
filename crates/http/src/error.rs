//! Error handling for the HTTP layer

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Message returned for every request rejected before reaching the store.
pub const INVALID_DATA: &str = "invalid data";

/// Standard error response format for all HTTP errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid data")]
    Validation { details: Vec<serde_json::Value> },

    #[error("not found: {message}")]
    NotFound { message: String },

    /// Server-side failure. `message` is what the client sees; `cause`
    /// is only logged.
    #[error("{message}")]
    Internal {
        message: String,
        cause: Option<anyhow::Error>,
    },
}

impl AppError {
    /// Create a validation error
    pub fn validation(details: Vec<serde_json::Value>) -> Self {
        Self::Validation { details }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an internal error with a client-facing message and no cause
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            cause: None,
        }
    }

    /// Create an internal error that keeps its cause for the logs
    pub fn internal_with(message: impl Into<String>, cause: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, failures)| {
                failures.iter().map(move |failure| {
                    serde_json::json!({ "field": field, "error": failure.code })
                })
            })
            .collect();
        Self::validation(details)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(vec![serde_json::json!({ "body": rejection.body_text() })])
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(vec![serde_json::json!({ "query": rejection.body_text() })])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status();

        let message = match self {
            AppError::Validation { details } => {
                tracing::info!(
                    error_id = %error_id,
                    details = %serde_json::Value::Array(details),
                    "rejected invalid request"
                );
                INVALID_DATA.to_string()
            }
            AppError::NotFound { message } => {
                tracing::info!(error_id = %error_id, "{}", message);
                message
            }
            AppError::Internal { message, cause } => {
                match &cause {
                    Some(cause) => tracing::error!(
                        error_id = %error_id,
                        status_code = %status.as_u16(),
                        error = ?cause,
                        "{}",
                        message
                    ),
                    None => tracing::error!(
                        error_id = %error_id,
                        status_code = %status.as_u16(),
                        "{}",
                        message
                    ),
                }
                message
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}
