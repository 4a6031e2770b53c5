//! # HTTP Middleware
//!
//! Custom middleware for request processing.

pub mod auth;
pub mod request_id;

pub use auth::{auth_middleware, AuthenticatedUser};
pub use request_id::request_id_middleware;
