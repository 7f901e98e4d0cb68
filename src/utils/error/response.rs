//! HTTP response handling for errors

use super::types::DocflowError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl DocflowError {
    /// Status, machine-readable code and public message for this error
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            DocflowError::Unauthorized(_) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string())
            }
            DocflowError::Jwt(_) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid or expired token".to_string(),
            ),
            DocflowError::Forbidden(reason) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", reason.clone())
            }
            DocflowError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            DocflowError::Validation(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", self.to_string())
            }
            DocflowError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", self.to_string())
            }
            DocflowError::Serialization(_) => (
                StatusCode::BAD_REQUEST,
                "PARSING_ERROR",
                "Malformed JSON payload".to_string(),
            ),
            DocflowError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT", self.to_string()),
            DocflowError::InvalidStateTransition { .. } => (
                StatusCode::CONFLICT,
                "INVALID_STATE_TRANSITION",
                self.to_string(),
            ),
            DocflowError::RateLimit(_) => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMIT_EXCEEDED",
                self.to_string(),
            ),
            DocflowError::Timeout(_) => {
                (StatusCode::REQUEST_TIMEOUT, "TIMEOUT", self.to_string())
            }
            DocflowError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "Database operation failed".to_string(),
            ),
            DocflowError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                self.to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        }
    }

    /// Render the error with a request id attached
    pub fn to_response_with_request_id(&self, request_id: Option<String>) -> HttpResponse {
        let (status_code, error_code, message) = self.parts();

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
                request_id,
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

impl ResponseError for DocflowError {
    fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    fn error_response(&self) -> HttpResponse {
        self.to_response_with_request_id(None)
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    pub request_id: Option<String>,
}
