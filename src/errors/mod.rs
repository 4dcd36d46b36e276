//! Error handling module for the Smart Ping backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::completion::CompletionError;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const NO_CONTENT: &str = "NO_CONTENT";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const COMPLETION_ERROR: &str = "COMPLETION_ERROR";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
}

/// Message returned for every 5xx response.
pub const SERVER_ERROR_MESSAGE: &str = "Server Error";

/// Why a lookup came back empty. Both reasons look identical to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// The identifier is not a well-formed update id.
    MalformedId,
    /// The identifier is well-formed but no record has it.
    Missing,
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Missing or empty required input
    Validation(String),
    /// Unknown identifier
    NotFound {
        reason: NotFoundReason,
        message: String,
    },
    /// Nothing to summarize in the lookback window
    NoContent(String),
    /// Upstream completion failure of any kind
    Completion(String),
    /// Store failure
    Database(String),
}

impl AppError {
    /// Build the not-found error for an update id.
    pub fn update_not_found(id: &str, reason: NotFoundReason) -> Self {
        tracing::debug!(update_id = %id, ?reason, "Update not found");
        AppError::NotFound {
            reason,
            message: "Update not found".to_string(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::NoContent(_) => StatusCode::NOT_FOUND,
            AppError::Completion(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::NotFound { .. } => codes::NOT_FOUND,
            AppError::NoContent(_) => codes::NO_CONTENT,
            AppError::Completion(_) => codes::COMPLETION_ERROR,
            AppError::Database(_) => codes::DATABASE_ERROR,
        }
    }

    /// Get the error message, including internal detail for server errors.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound { message, .. } => message.clone(),
            AppError::NoContent(msg) => msg.clone(),
            AppError::Completion(msg) => msg.clone(),
            AppError::Database(msg) => msg.clone(),
        }
    }

    /// Get the message that is safe to send to the client.
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            SERVER_ERROR_MESSAGE.to_string()
        } else {
            self.message()
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(format!("Database error: {}", err))
    }
}

impl From<CompletionError> for AppError {
    fn from(err: CompletionError) -> Self {
        AppError::Completion(format!("Failed to generate response: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.public_message(),
            },
        }
    }
}

impl IntoResponse for AppError {
    /// Server errors are logged here and nowhere else.
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "Request failed: {}", self.message());
        }
        (status, Json(ErrorResponse::new(&self))).into_response()
    }
}
