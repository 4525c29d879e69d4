//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use aw_core::db::DbError;
use aw_core::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use utoipa::ToSchema;

/// API error type.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unauthorized (missing or invalid actor identity).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden (authenticated but not allowed).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Conflict (lost a race against a concurrent writer).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unprocessable entity (lifecycle precondition violated).
    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    /// Validation error with field-level details.
    #[error("Validation failed")]
    ValidationError(ValidationErrorDetails),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

/// Details for field-level validation errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetails {
    /// Overall validation error message.
    pub message: String,
    /// Field-specific errors.
    pub fields: HashMap<String, Vec<FieldError>>,
}

/// A single field validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Error code (e.g., "required", "length").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional error parameters (e.g., the length bound).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional error details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::UnprocessableEntity(_) => "INVALID_TRANSITION",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (message, details) = match &self {
            ApiError::ValidationError(details) => (
                details.message.clone(),
                Some(serde_json::to_value(&details.fields).unwrap_or_default()),
            ),
            _ => (self.to_string(), None),
        };

        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Unauthorized => {
                ApiError::Unauthorized("Authentication required".to_string())
            }
            EngineError::Forbidden(msg) => ApiError::Forbidden(msg),
            EngineError::NotFound { entity } => {
                ApiError::NotFound(format!("{entity} not found"))
            }
            EngineError::BadRequest(msg) => ApiError::BadRequest(msg),
            EngineError::InvalidTransition { status, op, reason } => {
                ApiError::UnprocessableEntity(format!(
                    "{reason} (cannot {op} asset in {status} status)"
                ))
            }
            EngineError::Conflict(msg) => ApiError::Conflict(msg),
            EngineError::Db(err) => err.into(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{entity} with id {id} not found"))
            }
            DbError::Constraint(msg) => ApiError::Conflict(msg),
            DbError::Serialization(msg) => ApiError::BadRequest(msg),
            err => ApiError::Database(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        fn convert(field: &str, e: &validator::ValidationError) -> FieldError {
            FieldError {
                code: e.code.to_string(),
                message: match &e.message {
                    Some(m) => m.to_string(),
                    None => format!("Field '{field}' failed validation: {}", e.code),
                },
                params: (!e.params.is_empty())
                    .then(|| serde_json::to_value(&e.params).unwrap_or_default()),
            }
        }

        let fields: HashMap<String, Vec<FieldError>> = err
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let converted = errors.iter().map(|e| convert(field, e)).collect();
                (field.to_string(), converted)
            })
            .collect();

        let message = match fields.keys().next() {
            Some(field) if fields.len() == 1 => format!("Validation failed for field '{field}'"),
            _ => format!("Validation failed for {} fields", fields.len()),
        };

        ApiError::ValidationError(ValidationErrorDetails { message, fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aw_core::asset::{AssetStatus, LifecycleOp};

    #[test]
    fn engine_errors_map_to_expected_statuses() {
        let cases: Vec<(EngineError, StatusCode)> = vec![
            (EngineError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                EngineError::Forbidden("nope".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                EngineError::NotFound { entity: "Asset" },
                StatusCode::NOT_FOUND,
            ),
            (
                EngineError::BadRequest("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                EngineError::InvalidTransition {
                    status: AssetStatus::Approved,
                    op: LifecycleOp::Claim,
                    reason: "Only pending assets can be claimed".into(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                EngineError::Conflict("raced".into()),
                StatusCode::CONFLICT,
            ),
            (
                EngineError::Db(DbError::PoolExhausted),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn invalid_transition_message_names_status_and_op() {
        let api: ApiError = EngineError::InvalidTransition {
            status: AssetStatus::Approved,
            op: LifecycleOp::Claim,
            reason: "Only pending assets can be claimed".into(),
        }
        .into();
        let msg = api.to_string();
        assert!(msg.contains("APPROVED"));
        assert!(msg.contains("claim"));
    }
}
