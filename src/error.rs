//! Unified API error handling
//!
//! Provides consistent error responses across all endpoints.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::validation::ValidationError;

/// Public message for every generation failure, whatever the cause.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate your trip plan. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Destination not recognized: {0}")]
    UnknownDestination(String),

    #[error("Trip plan generation failed: {0}")]
    GenerationFailed(String),

    #[error("PDF generation failed: {0}")]
    PdfGeneration(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UnknownDestination(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            Self::PdfGeneration(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::UnknownDestination(_) => "UNKNOWN_DESTINATION",
            Self::GenerationFailed(_) => "GENERATION_FAILED",
            Self::PdfGeneration(_) => "PDF_GENERATION_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Validation(e) => e.message.clone(),
            Self::BadRequest(msg) => msg.clone(),
            Self::UnknownDestination(reason) => {
                format!("We couldn't recognize that destination: {}", reason)
            }
            // Don't leak provider or internal details
            Self::GenerationFailed(_) => GENERATION_FAILED_MESSAGE.to_string(),
            Self::PdfGeneration(_) => "Failed to generate PDF".to_string(),
            Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }

    fn field(&self) -> Option<String> {
        match self {
            Self::Validation(e) => Some(e.field.to_string()),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = ?e, "Internal server error");
            }
            Self::GenerationFailed(detail) => {
                tracing::error!(detail = %detail, "Trip plan generation failed");
            }
            Self::PdfGeneration(detail) => {
                tracing::error!(detail = %detail, "PDF generation failed");
            }
            _ => {
                tracing::warn!(error = %self, "API error");
            }
        }

        let status = self.status_code();
        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
            field: self.field(),
        };

        (status, Json(body)).into_response()
    }
}

/// Prefix axum puts on body deserialization errors, before the
/// `path: message` detail.
const JSON_DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON with a bad field
            JsonRejection::JsonDataError(e) => Self::Validation(body_field_error(&e.body_text())),
            other => Self::BadRequest(other.body_text()),
        }
    }
}

fn body_field_error(text: &str) -> ValidationError {
    let detail = text.strip_prefix(JSON_DATA_ERROR_PREFIX).unwrap_or(text);
    match detail.split_once(": ") {
        Some((path, message)) if !path.is_empty() && !path.contains(char::is_whitespace) => {
            ValidationError::new(path.to_string(), message)
        }
        _ => ValidationError::new("body", detail),
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_failures_hide_provider_detail() {
        let err = ApiError::GenerationFailed("upstream said 401: bad key sk-123".into());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.public_message(), GENERATION_FAILED_MESSAGE);
    }

    #[test]
    fn validation_errors_carry_their_field() {
        let err = ApiError::from(ValidationError::new("email", "Please enter a valid email address"));
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.field().as_deref(), Some("email"));
        assert_eq!(err.public_message(), "Please enter a valid email address");
    }

    #[test]
    fn body_errors_name_the_offending_path() {
        let err = body_field_error(
            "Failed to deserialize the JSON body into the target type: dates.from: invalid date: 07/11/2024 at line 1 column 40",
        );
        assert_eq!(err.field, "dates.from");
        assert_eq!(err.message, "invalid date: 07/11/2024 at line 1 column 40");

        let err = body_field_error(
            "Failed to deserialize the JSON body into the target type: missing field `plan` at line 1 column 2",
        );
        assert_eq!(err.field, "body");
    }
}
