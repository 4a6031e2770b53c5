//! # Breakroom Error Infrastructure
//!
//! Error types and API response handling for the Breakroom service.
//!
//! Every handler returns [`Result`]; the [`AppError`] it fails with decides
//! the HTTP status, the machine readable `code` and whether its message is
//! safe to show to the client.

pub mod middleware;
pub mod rejection;
pub mod response;
pub mod traits;

use http::StatusCode;

pub use middleware::ErrorHandler;
pub use response::{ErrorBody, Paginated, PaginationMeta};
pub use traits::ResultExt;

/// Convenience type alias for Result with AppError.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Main application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("NotFound: {0}")]
    NotFound(String),

    #[error("BadRequest: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("JwtExpired: Token has expired")]
    JwtExpired,

    #[error("JwtInvalidSignature: Invalid token signature")]
    JwtInvalidSignature,

    #[error("JwtInvalidToken: Invalid token")]
    JwtInvalidToken,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Request body failed field validation.
    #[error("Validation: {0}")]
    Validation(String),

    #[error("Internal: {0}")]
    Internal(String),

    #[error("Database: {0}")]
    Database(String),

    #[error("IO: {0}")]
    Io(String),

    #[error("Config: {0}")]
    Config(String),

    #[error("Migration: {0}")]
    Migration(String),
}

/// Counts reported by one dictionary seed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedResult {
    pub seed_name:      String,
    /// Rows written by this run
    pub inserted_count: usize,
    /// Rows whose code was already present
    pub skipped_count:  usize,
    pub duration_ms:    u64,
}

impl SeedResult {
    #[must_use]
    pub fn success(seed_name: &str, inserted: usize, skipped: usize, duration_ms: u64) -> Self {
        Self {
            seed_name: seed_name.to_string(),
            inserted_count: inserted,
            skipped_count: skipped,
            duration_ms,
        }
    }

    /// Rows the seed provider declared, written or not.
    #[must_use]
    pub fn total(&self) -> usize { self.inserted_count + self.skipped_count }
}

impl AppError {
    #[inline]
    pub fn not_found(resource: impl ToString) -> Self { Self::NotFound(resource.to_string()) }

    #[inline]
    pub fn bad_request(message: impl ToString) -> Self { Self::BadRequest(message.to_string()) }

    #[inline]
    pub fn unauthorized(message: impl ToString) -> Self { Self::Unauthorized(message.to_string()) }

    #[inline]
    pub fn forbidden(message: impl ToString) -> Self { Self::Forbidden(message.to_string()) }

    #[inline]
    pub fn conflict(message: impl ToString) -> Self { Self::Conflict(message.to_string()) }

    #[inline]
    pub fn validation(message: impl ToString) -> Self { Self::Validation(message.to_string()) }

    #[inline]
    pub fn internal(message: impl ToString) -> Self { Self::Internal(message.to_string()) }

    #[inline]
    pub fn database(message: impl ToString) -> Self { Self::Database(message.to_string()) }

    #[inline]
    pub fn config(message: impl ToString) -> Self { Self::Config(message.to_string()) }

    #[inline]
    pub fn migration(message: impl ToString) -> Self { Self::Migration(message.to_string()) }

    /// HTTP status and wire code for this error.
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::JwtExpired => (StatusCode::UNAUTHORIZED, "JWT_EXPIRED"),
            Self::JwtInvalidSignature => (StatusCode::UNAUTHORIZED, "JWT_INVALID_SIGNATURE"),
            Self::JwtInvalidToken => (StatusCode::UNAUTHORIZED, "JWT_INVALID_TOKEN"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            Self::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            Self::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            Self::Migration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "MIGRATION_ERROR"),
        }
    }

    pub fn status(&self) -> StatusCode { self.classify().0 }

    pub fn code(&self) -> &'static str { self.classify().1 }

    /// The carried message, `None` for the token variants.
    fn detail(&self) -> Option<&str> {
        match self {
            Self::JwtExpired | Self::JwtInvalidSignature | Self::JwtInvalidToken => None,
            Self::NotFound(m)
            | Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::Conflict(m)
            | Self::Validation(m)
            | Self::Internal(m)
            | Self::Database(m)
            | Self::Io(m)
            | Self::Config(m)
            | Self::Migration(m) => Some(m),
        }
    }

    /// Message shown to API clients.
    pub fn message(&self) -> String {
        match self.detail() {
            Some(message) => message.to_string(),
            None => {
                match self {
                    Self::JwtExpired => "Token has expired",
                    Self::JwtInvalidSignature => "Invalid token signature",
                    _ => "Invalid token",
                }
                .to_string()
            },
        }
    }

    /// Whether the message may be shown to API clients as-is.
    pub fn is_client_error(&self) -> bool { self.status().is_client_error() }

    /// Prefix the message with `context`; token errors pass through unchanged.
    pub fn context(self, context: impl ToString) -> Self {
        let prefix = |m: String| format!("{}: {}", context.to_string(), m);
        match self {
            Self::NotFound(m) => Self::NotFound(prefix(m)),
            Self::BadRequest(m) => Self::BadRequest(prefix(m)),
            Self::Unauthorized(m) => Self::Unauthorized(prefix(m)),
            Self::Forbidden(m) => Self::Forbidden(prefix(m)),
            Self::Conflict(m) => Self::Conflict(prefix(m)),
            Self::Validation(m) => Self::Validation(prefix(m)),
            Self::Internal(m) => Self::Internal(prefix(m)),
            Self::Database(m) => Self::Database(prefix(m)),
            Self::Io(m) => Self::Io(prefix(m)),
            Self::Config(m) => Self::Config(prefix(m)),
            Self::Migration(m) => Self::Migration(prefix(m)),
            token @ (Self::JwtExpired | Self::JwtInvalidSignature | Self::JwtInvalidToken) => token,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self { Self::Internal(err.to_string()) }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self { Self::Io(err.to_string()) }
}

impl From<String> for AppError {
    fn from(s: String) -> Self { Self::BadRequest(s) }
}

impl From<&str> for AppError {
    fn from(s: &str) -> Self { Self::BadRequest(s.to_string()) }
}

/// Missing rows become 404, anything else is a database failure.
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::RecordNotFound(what) => Self::NotFound(what),
            other => Self::Database(other.to_string()),
        }
    }
}

/// Errors raised inside a transaction closure come back unchanged.
impl From<sea_orm::TransactionError<AppError>> for AppError {
    fn from(err: sea_orm::TransactionError<AppError>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(db) => db.into(),
            sea_orm::TransactionError::Transaction(app) => app,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::JwtExpired,
            ErrorKind::InvalidSignature => Self::JwtInvalidSignature,
            _ => Self::JwtInvalidToken,
        }
    }
}

/// Field messages are sorted and joined so the output is stable.
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| format!("{} - invalid value", field))
                })
            })
            .collect();
        messages.sort();

        if messages.is_empty() {
            Self::Validation("Validation failed".to_string())
        }
        else {
            Self::Validation(messages.join(", "))
        }
    }
}
