//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use memo_core::{RepoError, StoreError};
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Request failures, each rendered as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad client input.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Missing server-side settings, reported before any external call.
    #[error("{0}")]
    Configuration(String),

    /// Generation backend failure; the message is passed through.
    #[error("{0}")]
    Upstream(String),

    /// Storage failure or an unreadable request body.
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Configuration(_) | Self::Upstream(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=request_failed module=http status=error http_status={} error={}",
                status.as_u16(),
                self
            );
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err.to_string()),
            RepoError::NotFound(id) => Self::NotFound(format!("memo not found: {id}")),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Repo(err) => err.into(),
            StoreError::NotCached(id) => Self::NotFound(format!("memo not found: {id}")),
            err @ StoreError::NotSuggested { .. } => Self::Validation(err.to_string()),
        }
    }
}
