//! Error handling module for the portfolio backend.
//!
//! Provides the central error taxonomy with mapping to HTTP status codes and
//! the external response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Per-field detail attached to validation failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// No identity attached to the request
    Unauthenticated(String),
    /// Identity present but lacks the required role
    PermissionDenied(String),
    /// Malformed request payload, carries per-field detail
    InvalidArgument {
        message: String,
        fields: Vec<FieldError>,
    },
    /// Resource not found
    NotFound(String),
    /// Uniqueness conflict (e.g. duplicate slug)
    AlreadyExists(String),
    /// Infrastructure failure; the cause is logged, never exposed verbatim
    Internal(String),
}

impl AppError {
    /// Build an `InvalidArgument` without field detail.
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::InvalidArgument {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the stable error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated(_) => codes::UNAUTHENTICATED,
            AppError::PermissionDenied(_) => codes::PERMISSION_DENIED,
            AppError::InvalidArgument { .. } => codes::INVALID_ARGUMENT,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::AlreadyExists(_) => codes::ALREADY_EXISTS,
            AppError::Internal(_) => codes::INTERNAL,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthenticated(msg) => msg.clone(),
            AppError::PermissionDenied(msg) => msg.clone(),
            AppError::InvalidArgument { message, .. } => message.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::AlreadyExists(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
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
        if let sqlx::Error::Database(ref db_err) = err {
            if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
                return AppError::AlreadyExists(
                    "A record with the same unique value already exists".to_string(),
                );
            }
        }
        tracing::error!("Database error: {:?}", err);
        AppError::Internal(format!("Database error: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {:?}", err);
        AppError::Internal(format!("I/O error: {}", err))
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        tracing::error!("Image processing error: {:?}", err);
        AppError::Internal(format!("Image processing error: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!("Background task error: {:?}", err);
        AppError::Internal("Background task failed".to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        AppError::Unauthenticated("Invalid or expired token".to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::invalid(format!("JSON error: {}", err))
    }
}

/// Unpack validator errors into the field-detail list before classification.
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_field_errors(&err, "", &mut fields);
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::InvalidArgument {
            message: "Validation failed".to_string(),
            fields,
        }
    }
}

fn collect_field_errors(
    errors: &validator::ValidationErrors,
    prefix: &str,
    out: &mut Vec<FieldError>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for e in field_errors {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value ({})", e.code));
                    out.push(FieldError {
                        field: path.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_field_errors(nested, &path, out);
            }
            ValidationErrorsKind::List(items) => {
                for (idx, nested) in items {
                    collect_field_errors(nested, &format!("{}[{}]", path, idx), out);
                }
            }
        }
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        let details = match error {
            AppError::InvalidArgument { fields, .. } if !fields.is_empty() => {
                serde_json::to_value(fields).ok()
            }
            _ => None,
        };

        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
                details,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Title is required"))]
        title: String,
        #[validate(email(message = "Invalid email address"))]
        email: String,
    }

    #[test]
    fn validation_errors_aggregate_all_fields() {
        let sample = Sample {
            title: String::new(),
            email: "not-an-email".to_string(),
        };
        let err: AppError = sample.validate().unwrap_err().into();

        match err {
            AppError::InvalidArgument { ref fields, .. } => {
                assert_eq!(fields.len(), 2);
                assert!(fields.iter().any(|f| f.field == "title"));
                assert!(fields.iter().any(|f| f.field == "email"));
            }
            other => panic!("expected InvalidArgument, got {}", other),
        }
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            AppError::Unauthenticated(String::new()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::PermissionDenied(String::new()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::invalid("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::NotFound(String::new()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::AlreadyExists(String::new()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal(String::new()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
