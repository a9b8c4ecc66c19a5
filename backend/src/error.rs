//! Error handling for the Leather Factory Tracker
//!
//! Every failure is turned into a JSON error body with a stable code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Conflict: {message}")]
    Conflict { resource: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Cost calculation error: {0}")]
    CostOverflow(#[from] shared::CostOverflow),
}

/// Extended result code SQLite uses when an `ON DELETE RESTRICT` action
/// blocks a delete. sqlx does not classify it as a foreign key violation.
const SQLITE_CONSTRAINT_TRIGGER: &str = "1811";

impl AppError {
    /// Classify a failed write against `entity`.
    ///
    /// Unique violations become `DuplicateEntry`, foreign key violations become
    /// `Conflict`; anything else stays a database error.
    pub fn from_db(err: sqlx::Error, entity: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            let restricted = db_err.code().as_deref() == Some(SQLITE_CONSTRAINT_TRIGGER)
                && db_err.message().contains("FOREIGN KEY");

            match db_err.kind() {
                ErrorKind::UniqueViolation => return AppError::DuplicateEntry(entity.to_string()),
                ErrorKind::ForeignKeyViolation => return AppError::fk_conflict(entity),
                _ if restricted => return AppError::fk_conflict(entity),
                ErrorKind::CheckViolation => {
                    return AppError::Validation {
                        field: entity.to_string(),
                        message: db_err.message().to_string(),
                    }
                }
                _ => {}
            }
        }
        AppError::DatabaseError(err)
    }

    fn fk_conflict(entity: &str) -> Self {
        AppError::Conflict {
            resource: entity.to_string(),
            message: format!("{} references a missing record or is still referenced", entity),
        }
    }

    /// True for unique constraint failures
    pub fn is_duplicate(&self) -> bool {
        matches!(self, AppError::DuplicateEntry(_))
    }

    /// True for foreign key failures
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict { .. })
    }
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

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message: format!("A record with this {} already exists", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::Conflict { resource, message } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "CONFLICT".to_string(),
                    message: message.clone(),
                    field: Some(resource.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", msg),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message: "A database error occurred".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::CostOverflow(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "COST_OVERFLOW".to_string(),
                    message: err.to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
