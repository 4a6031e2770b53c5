//! # Breakroom API Server
//!
//! Axum-based HTTP API for organisations, groups, membership offers and the
//! shift/lunch-break scheduler.
//!
//! ## Modules
//!
//! - [`handlers`]: request handlers, one module per resource
//! - [`dto`]: request/response data transfer objects
//! - [`middleware`]: request ids and JWT authentication
//! - [`router`]: route table under `/api/v1`
//! - [`scheduling`]: pure shift and break rules

use std::time::Instant;

use ::auth::{JwtConfig, PasswordConfig};

pub mod access;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod scheduling;
pub mod utils;

pub use router::create_app_router;

/// Application state shared across request handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub db:              sea_orm::DbConn,
    /// JWT configuration
    pub jwt_config:      JwtConfig,
    /// Argon2 cost parameters for new hashes
    pub password_config: PasswordConfig,
    /// Server start time for uptime calculation
    pub start_time:      Instant,
}

impl AppState {
    /// State with default hashing costs.
    #[must_use]
    pub fn new(db: sea_orm::DbConn, jwt_config: JwtConfig) -> Self {
        Self {
            db,
            jwt_config,
            password_config: PasswordConfig::default(),
            start_time: Instant::now(),
        }
    }

    /// Overrides the hashing costs.
    #[must_use]
    pub fn with_password_config(mut self, password_config: PasswordConfig) -> Self {
        self.password_config = password_config;
        self
    }
}

/// Server initialization result
#[derive(Debug)]
pub struct ServerResult {
    /// The address the server is bound to
    pub address:    String,
    /// Server start timestamp for logging
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl ServerResult {
    /// Creates a new server result
    #[must_use]
    pub fn new(address: &str) -> Self {
        Self {
            address:    address.to_string(),
            started_at: chrono::Utc::now(),
        }
    }
}
