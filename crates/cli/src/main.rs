//! # Breakroom CLI
//!
//! Command-line entry point for the Breakroom shift and lunch-break API.
//!
//! ## Usage
//!
//! ```bash
//! breakroom serve      # Start the API server (runs migrations first)
//! breakroom migrate    # Apply pending migrations
//! breakroom validate   # Check configuration without starting
//! breakroom --help
//! ```

mod commands;
mod config;
mod server;

use clap::{CommandFactory as _, Parser};
use commands::Commands;
use error::Result;

/// Breakroom - shifts and lunch breaks for support teams
#[derive(Parser, Debug)]
#[command(name = "breakroom")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, global = true, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, global = true, env = "BREAKROOM_LOG_FORMAT", default_value = "compact")]
    log_format: String,

    /// Also write logs to this file, rotated daily
    #[arg(long, global = true, env = "BREAKROOM_LOG_FILE")]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; real environment variables win either way
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let _guard = logging::init(&cli.log_level, &cli.log_format, cli.log_file.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    logging::info!(target: "app", command = ?cli.command, "Breakroom CLI starting...");

    match cli.command {
        Commands::Serve(args) => {
            let database = migration::db::load_config_from_env()?;
            let jwt_config = config::jwt_config_from_env()?;
            server::serve(&database, jwt_config, &args).await?;
        },
        Commands::Migrate(args) => {
            let database = migration::db::load_config_from_env()?;
            commands::migrate::migrate(&database, args).await?;
        },
        Commands::Completions(args) => commands::completions::completions(args.shell, &mut Cli::command())?,
        Commands::Validate => commands::validate::validate()?,
    }

    logging::info!(target: "app", "Breakroom CLI completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() { Cli::command().debug_assert(); }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from(["breakroom", "serve", "--host", "127.0.0.1", "--port", "8080"]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.host, "127.0.0.1");
                assert_eq!(args.port, 8080);
                assert!(!args.skip_migrations);
            },
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["breakroom", "validate", "--log-format", "json"]);
        assert!(matches!(cli.command, Commands::Validate));
        assert_eq!(cli.log_format, "json");
    }

    #[test]
    fn test_migrate_flags() {
        let cli = Cli::parse_from(["breakroom", "migrate", "--rollback"]);
        match cli.command {
            Commands::Migrate(args) => {
                assert!(args.rollback);
                assert!(!args.dry_run);
            },
            _ => panic!("Expected Migrate command"),
        }

        assert!(Cli::try_parse_from(["breakroom", "migrate", "--rollback", "--dry-run"]).is_err());
    }

    #[test]
    fn test_completions_shell() {
        let cli = Cli::parse_from(["breakroom", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Commands::Completions(commands::CompletionsArgs {
                shell: clap_complete::Shell::Bash,
            })
        ));
    }
}
