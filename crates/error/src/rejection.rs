//! # Rejection Handlers
//!
//! Converts axum extractor rejections into [`AppError`] so malformed input
//! uses the same envelope as every other failure.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};

use crate::AppError;

/// Map a JSON body rejection, surfacing the missing field name when serde reports one.
pub fn handle_json_rejection(rejection: JsonRejection) -> AppError {
    let error_message = rejection.body_text();

    let message = error_message
        .find("missing field `")
        .and_then(|start| {
            let rest = &error_message[start + 15 ..];
            rest.find('`')
                .map(|end| format!("{} - required field.", &rest[.. end]))
        })
        .unwrap_or(error_message);

    AppError::bad_request(message)
}

/// Map a query string rejection.
pub fn handle_query_rejection(rejection: QueryRejection) -> AppError {
    AppError::bad_request(format!("Invalid query string: {}", rejection.body_text()))
}

/// Map a path parameter rejection.
pub fn handle_path_rejection(rejection: PathRejection) -> AppError {
    AppError::bad_request(format!("Invalid path: {}", rejection.body_text()))
}
