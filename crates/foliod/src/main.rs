//! Folio Daemon - portfolio API server
//!
//! Serves experience levels, progression and settings over HTTP.

use anyhow::{Context, Result};
use folio_shared::LevelTable;
use foliod::config::Config;
use foliod::db::FolioDb;
use foliod::server::{self, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Folio Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load();

    let db = FolioDb::open_at(&config.storage.db_path)
        .with_context(|| format!("opening database {}", config.storage.db_path))?;

    // First run gets the built-in ladder
    if db.level_count()? == 0 {
        let seeded = db.seed_levels(&LevelTable::defaults())?;
        info!("  Seeded {} default experience levels", seeded);
    }

    server::run(AppState::new(config, db)).await?;

    info!("Shutting down gracefully");
    Ok(())
}
