//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::SiteError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message
    pub error: String,
    /// Error code for programmatic handling
    pub code: String,
    /// Where a missing asset was expected, for tracker lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_path: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
            expected_path: None,
        }
    }

    pub fn with_expected_path(mut self, path: impl Into<String>) -> Self {
        self.expected_path = Some(path.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Site operation error
    Site(SiteError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Site(e) => match e {
                SiteError::NotFound(msg) => {
                    (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg))
                }
                SiteError::TrackerImageNotFound {
                    message,
                    expected_path,
                } => (
                    StatusCode::NOT_FOUND,
                    ApiError::new("NOT_FOUND", message)
                        .with_expected_path(expected_path.display().to_string()),
                ),
                SiteError::BadRequest(msg) => {
                    (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
                }
                other => {
                    tracing::error!(error = %other, "Request failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiError::new("INTERNAL_ERROR", other.to_string()),
                    )
                }
            },
        };

        (status, Json(error)).into_response()
    }
}

impl From<SiteError> for AppError {
    fn from(err: SiteError) -> Self {
        AppError::Site(err)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Task join error: {}", err))
    }
}
