use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::validation::{flatten_errors, FieldErrors};

/// Top-level message carried by every 422 response
pub const VALIDATION_MESSAGE: &str = "The given data was invalid.";

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Error body for every non-validation failure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Failed to update sales data",
    "message": "Connection pool timed out",
    "request_id": "req-abc123xyz",
    "timestamp": "2024-12-09T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// Operation context for storage failures, HTTP status reason otherwise
    #[schema(example = "Not Found")]
    pub error: String,
    /// Human-readable error description
    #[schema(example = "Sales data with ID 42 not found")]
    pub message: String,
    /// Unique request identifier for support and debugging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// RFC 3339 timestamp when the error occurred
    pub timestamp: String,
}

/// Error body for rejected payloads (422)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "message": "The given data was invalid.",
    "errors": {
        "product_name": ["The product name field is required."],
        "q1_sales": ["The q1 sales must be at least 0."]
    }
}))]
pub struct ValidationErrorResponse {
    pub message: String,
    /// Field name to every violation message for that field
    #[schema(value_type = Object)]
    pub errors: FieldErrors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{}", VALIDATION_MESSAGE)]
    Validation(FieldErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: DbErr,
    },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::Validation(flatten_errors(&err))
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        ServiceError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::BadRequest(rejection.body_text())
    }
}

impl ServiceError {
    /// Wraps a store failure with the operation that hit it.
    pub fn storage(context: impl Into<String>, source: DbErr) -> Self {
        ServiceError::Storage {
            context: context.into(),
            source,
        }
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage { .. } | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `error` field of the response body.
    pub fn response_error(&self) -> String {
        match self {
            Self::Storage { context, .. } => context.clone(),
            _ => self
                .status_code()
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
        }
    }

    /// The `message` field of the response body.
    pub fn response_message(&self) -> String {
        match self {
            Self::Storage { source, .. } => source.to_string(),
            Self::BadRequest(msg) | Self::NotFound(msg) => msg.clone(),
            Self::InternalError(_) => "Internal server error".to_string(),
            Self::Validation(_) => VALIDATION_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let request_id = current_request_id();

        if let ServiceError::Validation(errors) = self {
            let body = ValidationErrorResponse {
                message: VALIDATION_MESSAGE.to_string(),
                errors,
                request_id,
            };
            return (status, Json(body)).into_response();
        }

        let err = ErrorResponse {
            error: self.response_error(),
            message: self.response_message(),
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}
