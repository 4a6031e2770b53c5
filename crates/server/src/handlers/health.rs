//! Liveness endpoint.

use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`
    pub status:         String,
    pub version:        String,
    pub uptime_seconds: u64,
    /// `connected` or `unreachable`
    pub database:       String,
}

/// Service health, never fails
pub async fn health_handler(state: &AppState) -> Json<HealthResponse> {
    let database_ok = match state.db.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Database ping failed");
            false
        },
    };

    Json(HealthResponse {
        status:         if database_ok { "ok" } else { "degraded" }.to_string(),
        version:        env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        database:       if database_ok { "connected" } else { "unreachable" }.to_string(),
    })
}
