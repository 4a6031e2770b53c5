//! # Request Handlers
//!
//! One module per resource. Handlers take the state, the authenticated user
//! and already extracted request values; the router wraps them in axum
//! extractors.

pub mod auth;
pub mod breaks;
pub mod dictionaries;
pub mod employees;
pub mod groups;
pub mod health;
pub mod members;
pub mod offers;
pub mod organisations;
pub mod replacements;
pub mod shift_member;
pub mod users;
