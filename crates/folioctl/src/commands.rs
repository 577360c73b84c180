//! Command handlers for folioctl.
//!
//! Every handler opens the database itself so commands stay independent of
//! each other; the daemon does not need to be running.

use crate::display;
use crate::table_file;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use folio_shared::years::parse_date;
use folio_shared::{
    candidate, estimate, resolve, start_date_or, validate_candidates, ExperienceEngine,
    LevelStore, LevelTable, SystemClock,
};
use foliod::config::Config;
use foliod::db::FolioDb;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Database location: `--db` wins over the daemon config
pub fn db_path(explicit: Option<PathBuf>, config: &Config) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(&config.storage.db_path))
}

fn open(path: &Path) -> Result<FolioDb> {
    debug!("Opening {}", path.display());
    FolioDb::open_at(path).with_context(|| format!("opening database {}", path.display()))
}

/// Replace the stored table with the built-in ladder, or with a validated file
pub fn seed(db: &Path, file: Option<&Path>) -> Result<()> {
    let table = match file {
        Some(file) => {
            let candidates = table_file::load(file)?;
            let levels = candidate::accept(&candidates)
                .map_err(|e| anyhow::anyhow!("{}: {}", file.display(), e))?;
            LevelTable::new(levels)
        }
        None => LevelTable::defaults(),
    };

    let db = open(db)?;
    let seeded = db.seed_levels(&table)?;
    display::ok(&format!("Seeded {} experience levels", seeded));
    Ok(())
}

/// Check a table file offline and report every problem
pub fn validate_file(file: &Path) -> Result<()> {
    let candidates = table_file::load(file)?;
    let report = validate_candidates(&candidates);

    if report.is_ok() {
        display::ok(&format!(
            "{}: {} levels, no problems found",
            file.display(),
            candidates.len()
        ));
        return Ok(());
    }

    display::header(&format!("{}", file.display()));
    for error in &report.errors {
        display::error_line(error);
    }
    println!();
    bail!("{} problem(s) found", report.errors.len())
}

/// Stored levels: active ones by lower bound, or every row in insertion order
pub fn levels(db: &Path, all: bool) -> Result<()> {
    let table = open(db)?.load_table()?;

    if all {
        display::header(&format!("Experience levels ({} stored)", table.len()));
        for range in table.entries() {
            display::level_row(range);
        }
    } else {
        let normalized = table.normalized();
        display::header(&format!("Experience levels ({} active)", normalized.len()));
        for range in normalized.entries() {
            display::level_row(range);
        }
    }

    if table.is_empty() {
        println!("  {}", "No levels stored. Run `folioctl seed`.".yellow());
    }
    println!();
    Ok(())
}

pub fn parse_years(raw: &str) -> Result<f64> {
    let years: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("invalid years: {}", raw))?;
    if !years.is_finite() || years < 0.0 {
        bail!("invalid years: {}", raw);
    }
    Ok(years)
}

/// Level and progression for an explicit duration
pub fn resolve_years(db: &Path, raw: &str) -> Result<()> {
    let years = parse_years(raw)?;
    let table = open(db)?.load_table()?;

    display::header(&format!("{} years", years));
    match resolve(years, &table) {
        Some(range) => {
            display::level_detail(range);
            println!();
            display::progression(&estimate(years, &table));
        }
        None => println!("  {}", "No experience level configured for this duration".yellow()),
    }
    println!();
    Ok(())
}

fn engine_for(db: &FolioDb, config: &Config, start: Option<&str>) -> Result<ExperienceEngine> {
    let start_date: DateTime<Utc> = match start {
        Some(raw) => parse_date(raw)?,
        None => start_date_or(db, config.experience.start_date())?,
    };
    Ok(ExperienceEngine::new(Arc::new(SystemClock), start_date))
}

/// Experience as of now
pub fn current(db_path: &Path, config: &Config, start: Option<&str>) -> Result<()> {
    let db = open(db_path)?;
    let table = db.load_table()?;
    let snapshot = engine_for(&db, config, start)?.snapshot(&table);

    display::header("Current experience");
    display::snapshot(&snapshot);
    println!();
    Ok(())
}

/// Level at January 1st of every year since the start date
pub fn timeline(db_path: &Path, config: &Config, start: Option<&str>) -> Result<()> {
    let db = open(db_path)?;
    let table = db.load_table()?;
    let entries = engine_for(&db, config, start)?.timeline(&table);

    display::header("Experience timeline");
    if entries.is_empty() {
        println!("  {}", "Start date is in the future".yellow());
    }
    for entry in &entries {
        display::timeline_row(entry);
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_years() {
        assert_eq!(parse_years("4.5").unwrap(), 4.5);
        assert!(parse_years("-0.1").is_err());
        assert!(parse_years("inf").is_err());
        assert!(parse_years("four").is_err());
    }

    #[test]
    fn test_db_path_override() {
        let config = Config::default();
        assert_eq!(
            db_path(Some(PathBuf::from("/tmp/x.db")), &config),
            PathBuf::from("/tmp/x.db")
        );
        assert_eq!(
            db_path(None, &config),
            PathBuf::from(&config.storage.db_path)
        );
    }
}
