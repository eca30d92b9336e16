//! # QRganize CLI (`qrg`)
//!
//! ## Usage
//!
//! ```bash
//! qrg --config ./qrganize.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `qrg init` | Create the SQLite database and run schema migrations |
//! | `qrg serve` | Start the HTTP API server |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use qrganize::config::load_config;
use qrganize::migrate::run_migrations;
use qrganize::server::run_server;

/// QRganize: catalog and metadata service for a comic-management
/// application.
#[derive(Parser)]
#[command(name = "qrg", version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "qrganize.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and run schema migrations
    Init,
    /// Start the HTTP API server
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            run_migrations(&config).await?;
            println!("Database initialized at {}", config.db.path.display());
        }
        Commands::Serve => {
            run_server(&config).await?;
        }
    }

    Ok(())
}
