//! # Breakroom Logging Infrastructure
//!
//! Structured logging for the Breakroom service: subscriber construction from
//! environment-driven configuration, request ids, and logging macros.

pub mod config;
pub mod macros;
pub mod request_id;

pub use config::{LogFormat, LoggingConfig, LoggingGuard};
pub use request_id::RequestId;
// Re-export tracing macros
pub use tracing::{debug, error, info, trace, warn};

/// Initialize the logging system.
///
/// # Arguments
///
/// * `level` - Log level (debug, info, warn, error)
/// * `format` - Output format (json, pretty, compact)
/// * `log_file` - Optional path to log file
///
/// The returned guard must be kept alive for file output to be flushed.
pub fn init(
    level: &str,
    format: &str,
    log_file: Option<&str>,
) -> Result<LoggingGuard, tracing::subscriber::SetGlobalDefaultError> {
    init_with_config(LoggingConfig::from_env(level, format, log_file))
}

/// Initialize logging with a custom configuration.
pub fn init_with_config(config: LoggingConfig) -> Result<LoggingGuard, tracing::subscriber::SetGlobalDefaultError> {
    let (subscriber, guard) = config.build();
    tracing::subscriber::set_global_default(subscriber)?;
    info!(
        level = %config.level,
        format = %config.format,
        environment = %config.environment,
        "Logging initialized"
    );
    Ok(guard)
}
