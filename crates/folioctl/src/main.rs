//! Folio Control - operator CLI
//!
//! Seeds, validates and inspects the experience-level table directly in the
//! daemon's database.

use anyhow::Result;
use clap::{Parser, Subcommand};
use folioctl::commands;
use foliod::config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folioctl")]
#[command(about = "Folio - experience level administration", long_about = None)]
#[command(version)]
struct Cli {
    /// Database path (defaults to storage.db_path from the daemon config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the stored table with the default ladder
    Seed {
        /// Seed from a .toml or .json table file instead
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Check a .toml or .json table file without touching the database
    Validate {
        file: PathBuf,
    },

    /// List stored levels
    Levels {
        /// Include inactive levels, in insertion order
        #[arg(long)]
        all: bool,
    },

    /// Show the level covering a number of years
    Resolve {
        years: String,
    },

    /// Show current experience
    Current {
        /// Start date override (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        start: Option<String>,
    },

    /// Show the year-by-year timeline
    Timeline {
        /// Start date override (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        start: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Validation is offline; skip config lookup entirely
    if let Commands::Validate { file } = &cli.command {
        return commands::validate_file(file);
    }

    let config = Config::load();
    let db = commands::db_path(cli.db, &config);

    match cli.command {
        Commands::Seed { file } => commands::seed(&db, file.as_deref()),
        Commands::Validate { .. } => Ok(()),
        Commands::Levels { all } => commands::levels(&db, all),
        Commands::Resolve { years } => commands::resolve_years(&db, &years),
        Commands::Current { start } => commands::current(&db, &config, start.as_deref()),
        Commands::Timeline { start } => commands::timeline(&db, &config, start.as_deref()),
    }
}
