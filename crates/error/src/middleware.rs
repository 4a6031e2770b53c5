//! # Error Responses
//!
//! Turns [`AppError`] into HTTP responses carrying the standard error envelope.
//!
//! ## Usage
//!
//! ```rust
//! use error::{AppError, ErrorHandler};
//!
//! let handler = ErrorHandler::new(false);
//! let response = handler.to_response(&AppError::not_found("Group not found"));
//! assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{response::ErrorBody, AppError};

/// Error handler that converts errors to HTTP responses.
#[derive(Debug, Clone, Copy)]
pub struct ErrorHandler {
    /// Whether server-side failure details reach the client.
    pub include_details: bool,
}

impl ErrorHandler {
    /// Create a new error handler.
    #[inline]
    pub fn new(include_details: bool) -> Self {
        Self {
            include_details,
        }
    }

    /// Convert an error to a response.
    ///
    /// Client errors always carry their message; 5xx messages are replaced
    /// unless `include_details` is set.
    pub fn to_response(&self, err: &AppError) -> Response {
        let status = err.status();
        let message = if err.is_client_error() || self.include_details {
            err.message()
        }
        else {
            "Internal server error".to_string()
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = err.code(), error = %err, "Request failed");
        }
        else {
            tracing::debug!(code = err.code(), error = %err, "Request rejected");
        }

        (status, Json(ErrorBody::new(err.code(), message))).into_response()
    }
}

impl Default for ErrorHandler {
    fn default() -> Self { Self::new(false) }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response { ErrorHandler::default().to_response(&self) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_keeps_message() {
        let response = AppError::bad_request("Lunch time hasn't started yet.").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_error_status() {
        let response = ErrorHandler::new(true).to_response(&AppError::database("connection reset"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
