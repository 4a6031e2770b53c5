//! # Logging Configuration
//!
//! Configuration for the logging subsystem.
//! Supports environment variables and programmatic configuration.

use std::{fmt as stdfmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, Registry};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    #[default]
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

impl stdfmt::Display for LogFormat {
    fn fmt(&self, f: &mut stdfmt::Formatter<'_>) -> stdfmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        };
        f.write_str(name)
    }
}

/// Logging configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    pub level: String,

    /// Output format
    pub format: LogFormat,

    /// Optional log file path, rotated daily
    pub log_file: Option<String>,

    /// Whether to include timestamps
    pub include_timestamp: bool,

    /// Environment (development, testing, production)
    pub environment: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level:             "info".to_string(),
            format:            LogFormat::default(),
            log_file:          None,
            include_timestamp: true,
            environment:       "development".to_string(),
        }
    }
}

/// Keeps the non-blocking file writer alive.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard(Option<WorkerGuard>);

impl LoggingGuard {
    /// Whether a file writer is attached.
    pub fn has_file_writer(&self) -> bool { self.0.is_some() }
}

type BoxedSubscriber = Box<dyn tracing::Subscriber + Send + Sync>;

impl LoggingConfig {
    /// Create configuration from environment variables, falling back to the given values.
    pub fn from_env(level: &str, format: &str, log_file: Option<&str>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), level, format, log_file)
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        level: &str,
        format: &str,
        log_file: Option<&str>,
    ) -> Self {
        let format = lookup("BREAKROOM_LOG_FORMAT").unwrap_or_else(|| format.to_string());

        Self {
            level: lookup("RUST_LOG").unwrap_or_else(|| level.to_string()),
            format: format.parse().unwrap_or_default(),
            log_file: lookup("BREAKROOM_LOG_FILE").or_else(|| log_file.map(str::to_string)),
            environment: lookup("BREAKROOM_ENV").unwrap_or_else(|| "development".to_string()),
            ..Default::default()
        }
    }

    /// Parsed level filter, `INFO` when the level string is not recognised.
    pub fn level_filter(&self) -> LevelFilter { self.level.parse().unwrap_or(LevelFilter::INFO) }

    /// Build the tracing subscriber from this configuration.
    pub fn build(&self) -> (BoxedSubscriber, LoggingGuard) {
        let level = self.level_filter();
        let (file_layer, guard) = match self.log_file.as_deref() {
            Some(path) => {
                let path = Path::new(path);
                let directory = path.parent().unwrap_or_else(|| Path::new("."));
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "breakroom.log".to_string());
                let appender = tracing_appender::rolling::daily(directory, file_name);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (
                    Some(fmt::layer().json().with_writer(writer)),
                    Some(guard),
                )
            },
            None => (None, None),
        };

        let registry = Registry::default().with(level).with(file_layer);
        let subscriber: BoxedSubscriber = match (self.format, self.include_timestamp) {
            (LogFormat::Json, true) => {
                Box::new(registry.with(fmt::layer().json().with_timer(fmt::time::UtcTime::rfc_3339())))
            },
            (LogFormat::Json, false) => Box::new(registry.with(fmt::layer().json().without_time())),
            (LogFormat::Pretty, true) => {
                Box::new(registry.with(fmt::layer().pretty().with_timer(fmt::time::UtcTime::rfc_3339())))
            },
            (LogFormat::Pretty, false) => Box::new(registry.with(fmt::layer().pretty().without_time())),
            (LogFormat::Compact, true) => {
                Box::new(registry.with(fmt::layer().compact().with_timer(fmt::time::UtcTime::rfc_3339())))
            },
            (LogFormat::Compact, false) => Box::new(registry.with(fmt::layer().compact().without_time())),
        };

        (subscriber, LoggingGuard(guard))
    }
}
