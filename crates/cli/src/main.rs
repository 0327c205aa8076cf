//! # Praxis CLI
//!
//! Command-line interface for the Praxis back office.
//!
//! ## Usage
//!
//! ```bash
//! praxis serve            # Start the API server (runs migrations automatically)
//! praxis migrate          # Run database migrations
//! praxis bootstrap-token  # Mint a one-shot bootstrap token
//! praxis --help           # Show help
//! ```

use clap::{Parser, Subcommand};
use error::Result;

mod commands;

/// Praxis - GCMC/KAJ back office
#[derive(Parser, Debug)]
#[command(name = "praxis")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (debug, info, warn, error)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "PRAXIS_LOG_FORMAT", default_value = "pretty")]
    log_format: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the API server
    Serve,

    /// Run database migrations
    Migrate(commands::MigrateArgs),

    /// Mint a one-shot bootstrap token for first-run setup
    BootstrapToken(commands::BootstrapTokenArgs),

    /// Generate shell completions
    Completions(commands::CompletionsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level, &cli.log_format, None)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    logging::info!(target: "app", command = ?cli.command, "Praxis CLI starting...");

    match cli.command {
        Commands::Serve => commands::serve::run().await?,
        Commands::Migrate(args) => commands::migrate::run(&args).await?,
        Commands::BootstrapToken(args) => commands::bootstrap_token::run(&args).await?,
        Commands::Completions(args) => commands::completions::run(&args),
    }

    Ok(())
}
