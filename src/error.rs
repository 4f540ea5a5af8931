//! Error handling module
//!
//! Provides unified error types and handling for the entire application.

use crate::catalog::{LoadError, QueryError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Load rejected: {0}")]
    Load(#[from] LoadError),

    #[error("Invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match &self {
            AppError::Load(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "LOAD_ERROR",
                "Catalog load rejected, the previous catalog is still active".to_string(),
                Some(e.to_string()),
            ),
            AppError::Query(e) => (
                StatusCode::BAD_REQUEST,
                "QUERY_ERROR",
                e.to_string(),
                None,
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
                None,
            ),
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            error: details,
            code: Some(error_code.to_string()),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper function to create a validation error
pub fn validation_error(msg: impl Into<String>) -> AppError {
    AppError::Validation(msg.into())
}

/// Helper function to create a not found error
pub fn not_found_error(msg: impl Into<String>) -> AppError {
    AppError::NotFound(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::error::RowKind;

    #[test]
    fn test_status_codes() {
        let load = AppError::from(LoadError::MissingKey {
            kind: RowKind::Dataset,
            row: 0,
            field: "view_name",
        });
        assert_eq!(load.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let query = AppError::from(QueryError::UnknownRelation("nope".to_string()));
        assert_eq!(query.into_response().status(), StatusCode::BAD_REQUEST);

        assert_eq!(
            not_found_error("gone").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            validation_error("bad").into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
