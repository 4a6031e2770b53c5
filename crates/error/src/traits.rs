//! # Error Traits
//!
//! Extension helpers for `Result` values flowing into [`AppError`].

use crate::{AppError, Result};

/// Extension methods for Result types.
pub trait ResultExt<T> {
    /// Convert the error into [`AppError`] and prefix its message.
    fn context<C: ToString>(self, context: C) -> Result<T>;

    /// Convert the error into [`AppError`] and log it at error level.
    fn log_error(self) -> Result<T>;

    /// Convert any database failure into a [`AppError::Database`] carrying `what`.
    fn db_context(self, what: &str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AppError> + std::fmt::Display,
{
    fn context<C: ToString>(self, context: C) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            err.context(context)
        })
    }

    fn log_error(self) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            tracing::error!(error = %err, "Error occurred");
            err
        })
    }

    fn db_context(self, what: &str) -> Result<T> {
        self.map_err(|e| AppError::database(format!("Failed to {}: {}", what, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context() {
        let result: Result<i32> = Err(AppError::not_found("Offer not found"));
        let err = result.context("Accepting offer").unwrap_err();

        assert_eq!(err.to_string(), "NotFound: Accepting offer: Offer not found");
    }

    #[test]
    fn test_db_context() {
        let result: std::result::Result<i32, sea_orm::DbErr> = Err(sea_orm::DbErr::Custom("gone".to_string()));
        let err = result.db_context("insert break").unwrap_err();

        assert_eq!(err.code(), "DATABASE_ERROR");
        assert!(err.message().starts_with("Failed to insert break"));
    }

    #[test]
    fn test_log_error_keeps_variant() {
        let result: Result<i32> = Err(AppError::forbidden("no"));
        assert!(matches!(result.log_error(), Err(AppError::Forbidden { .. })));
    }
}
