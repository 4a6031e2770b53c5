//! # CLI Server
//!
//! Boots the Breakroom API: database, migrations, router and a graceful
//! shutdown on Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use anyhow::anyhow;
use auth::JwtConfig;
use error::{Result, ResultExt as _};
use migration::{db::DatabaseConfig, Migrator, MigratorTrait as _};
use ::server::{create_app_router, AppState, ServerResult};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{commands::ServeArgs, config::parse_socket_addr};

/// Starts the API server and runs until a shutdown signal arrives.
pub async fn serve(config: &DatabaseConfig, jwt_config: JwtConfig, args: &ServeArgs) -> Result<()> {
    let address = parse_socket_addr(&args.host, args.port)
        .map_err(|e| anyhow!("Invalid address {}:{}: {}", args.host, args.port, e))?;

    info!(target: "serve", database = %config.redacted_connection_string(), "Connecting to database...");
    let db = config.connect().await?;

    if args.skip_migrations {
        warn!(target: "serve", "Skipping database migrations");
    }
    else {
        info!(target: "serve", "Running database migrations...");
        Migrator::up(&db, None)
            .await
            .context("Failed to run database migrations")
            .log_error()?;
        info!(target: "serve", "Database migrations completed successfully");
    }

    let app = create_app_router(AppState::new(db, jwt_config));
    serve_http(app, &address).await
}

async fn serve_http(app: axum::Router, address: &SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {}: {}", address, e))?;

    let started = ServerResult::new(&address.to_string());
    info!(target: "serve", address = %started.address, started_at = %started.started_at, "HTTP server listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!("HTTP server error: {}", e))?;

    info!(target: "serve", "Server stopped");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM.
///
/// A handler that fails to install is logged and never fires, so the other
/// signal still stops the server.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(target: "serve", error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                warn!(target: "serve", error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!(target: "serve", "Shutdown signal received");
}
