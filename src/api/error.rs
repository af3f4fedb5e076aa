//! Mapping from handler outcomes to HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::errors::StorageError;

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failure of a single API request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was malformed or missing a required field.
    #[error("{0}")]
    Validation(String),
    /// No item has the requested id.
    #[error("Item not found")]
    NotFound,
    /// The storage backend faulted while performing `op`.
    #[error("Failed to {op}: {source}")]
    Storage {
        op: &'static str,
        #[source]
        source: StorageError,
    },
}

impl ApiError {
    /// Builds a `map_err` adapter tagging storage faults with the operation name.
    pub fn storage(op: &'static str) -> impl FnOnce(StorageError) -> ApiError {
        move |source| ApiError::Storage { op, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Storage detail stays server-side.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Storage { op, .. } => format!("Failed to {}", op),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Storage { op, source } = &self {
            tracing::error!(operation = *op, error = %source, "storage fault");
        }
        let body = ErrorResponse {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
