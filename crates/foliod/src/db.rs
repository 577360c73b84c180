//! Folio Database - SQLite-backed persistence
//!
//! Schema:
//! - experience_levels: one row per level, unique by label, insertion order kept in `position`
//! - settings: key/value site settings
//! - analytics_events: page/event/data rows written on experience reads and updates
//!
//! Level replacement runs in a single transaction: either every candidate is
//! upserted or none is.

use anyhow::Result;
use chrono::{DateTime, Utc};
use folio_shared::{
    FolioError, LevelRange, LevelStore, LevelTable, Setting, SettingKind, SettingsStore,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// A recorded analytics event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub id: String,
    pub page: String,
    pub event: String,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

fn storage(e: rusqlite::Error) -> FolioError {
    FolioError::Storage(e.to_string())
}

/// SQLite-backed store for levels, settings and analytics events
pub struct FolioDb {
    conn: Connection,
}

impl FolioDb {
    /// Open or create the database at `path`
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path_ref)?;

        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let db = Self { conn };
        db.create_schema()?;
        info!("Opened database at {}", path_ref.display());
        Ok(db)
    }

    /// Throwaway database for tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.create_schema()?;
        Ok(db)
    }

    fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS experience_levels (
                label TEXT PRIMARY KEY,
                position INTEGER NOT NULL,
                min_years REAL NOT NULL,
                max_years REAL NOT NULL,
                color TEXT NOT NULL,
                icon TEXT NOT NULL,
                description TEXT NOT NULL,
                active INTEGER NOT NULL DEFAULT 1,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_levels_range ON experience_levels(min_years, max_years);

            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                kind TEXT NOT NULL DEFAULT 'string',
                description TEXT NOT NULL DEFAULT '',
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS analytics_events (
                id TEXT PRIMARY KEY,
                page TEXT NOT NULL,
                event TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_events_event ON analytics_events(event, created_at);
            "#,
        )?;
        Ok(())
    }

    /// Delete every level and write `table` in its place
    pub fn seed_levels(&self, table: &LevelTable) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM experience_levels", [])?;
        debug!("Cleared {} existing levels", removed);

        let now = Utc::now();
        for (position, range) in table.entries().iter().enumerate() {
            tx.execute(
                "INSERT INTO experience_levels
                    (label, position, min_years, max_years, color, icon, description, active, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    range.label,
                    position as i64,
                    range.min_years,
                    range.max_years,
                    range.color,
                    range.icon,
                    range.description,
                    range.active,
                    now,
                ],
            )?;
        }
        tx.commit()?;
        Ok(table.len())
    }

    pub fn level_count(&self) -> Result<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM experience_levels", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Store an analytics event
    pub fn record_event(
        &self,
        page: &str,
        event: &str,
        data: serde_json::Value,
    ) -> Result<AnalyticsEvent> {
        let record = AnalyticsEvent {
            id: uuid::Uuid::new_v4().to_string(),
            page: page.to_string(),
            event: event.to_string(),
            data,
            created_at: Utc::now(),
        };

        self.conn.execute(
            "INSERT INTO analytics_events (id, page, event, data, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id,
                record.page,
                record.event,
                serde_json::to_string(&record.data)?,
                record.created_at,
            ],
        )?;
        Ok(record)
    }

    /// Most recent events first, optionally filtered by event name
    pub fn recent_events(&self, event: Option<&str>, limit: usize) -> Result<Vec<AnalyticsEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, page, event, data, created_at FROM analytics_events
             WHERE (?1 IS NULL OR event = ?1)
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![event, limit as i64], |row| {
            let data: String = row.get(3)?;
            Ok(AnalyticsEvent {
                id: row.get(0)?,
                page: row.get(1)?,
                event: row.get(2)?,
                data: serde_json::from_str(&data).unwrap_or(serde_json::Value::Null),
                created_at: row.get(4)?,
            })
        })?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }
}

fn level_from_row(row: &Row<'_>) -> rusqlite::Result<LevelRange> {
    Ok(LevelRange {
        label: row.get(0)?,
        min_years: row.get(1)?,
        max_years: row.get(2)?,
        color: row.get(3)?,
        icon: row.get(4)?,
        description: row.get(5)?,
        active: row.get(6)?,
    })
}

fn setting_from_row(row: &Row<'_>) -> rusqlite::Result<Setting> {
    let kind: String = row.get(2)?;
    Ok(Setting {
        key: row.get(0)?,
        value: row.get(1)?,
        kind: SettingKind::parse(&kind),
        description: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

impl LevelStore for FolioDb {
    fn load_table(&self) -> folio_shared::error::Result<LevelTable> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT label, min_years, max_years, color, icon, description, active
                 FROM experience_levels ORDER BY position ASC",
            )
            .map_err(storage)?;

        let rows = stmt.query_map([], level_from_row).map_err(storage)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(storage)?);
        }
        Ok(LevelTable::new(entries))
    }

    fn replace_table(&self, candidates: &[LevelRange]) -> folio_shared::error::Result<usize> {
        let tx = self.conn.unchecked_transaction().map_err(storage)?;
        let now = Utc::now();

        let mut next_position: i64 = tx
            .query_row(
                "SELECT COALESCE(MAX(position) + 1, 0) FROM experience_levels",
                [],
                |row| row.get(0),
            )
            .map_err(storage)?;

        for range in candidates {
            let existing: Option<i64> = tx
                .query_row(
                    "SELECT position FROM experience_levels WHERE label = ?1",
                    params![range.label],
                    |row| row.get(0),
                )
                .optional()
                .map_err(storage)?;

            let position = match existing {
                Some(position) => position,
                None => {
                    next_position += 1;
                    next_position - 1
                }
            };

            tx.execute(
                "INSERT INTO experience_levels
                    (label, position, min_years, max_years, color, icon, description, active, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(label) DO UPDATE SET
                    min_years = excluded.min_years,
                    max_years = excluded.max_years,
                    color = excluded.color,
                    icon = excluded.icon,
                    description = excluded.description,
                    active = excluded.active,
                    updated_at = excluded.updated_at",
                params![
                    range.label,
                    position,
                    range.min_years,
                    range.max_years,
                    range.color,
                    range.icon,
                    range.description,
                    range.active,
                    now,
                ],
            )
            .map_err(storage)?;
        }

        tx.commit().map_err(storage)?;
        Ok(candidates.len())
    }
}

impl SettingsStore for FolioDb {
    fn get_setting(&self, key: &str) -> folio_shared::error::Result<Option<Setting>> {
        self.conn
            .query_row(
                "SELECT key, value, kind, description, updated_at FROM settings WHERE key = ?1",
                params![key],
                setting_from_row,
            )
            .optional()
            .map_err(storage)
    }

    fn list_settings(&self) -> folio_shared::error::Result<Vec<Setting>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value, kind, description, updated_at FROM settings ORDER BY key")
            .map_err(storage)?;
        let rows = stmt.query_map([], setting_from_row).map_err(storage)?;

        let mut settings = Vec::new();
        for row in rows {
            settings.push(row.map_err(storage)?);
        }
        Ok(settings)
    }

    fn set_setting(&self, setting: &Setting) -> folio_shared::error::Result<Setting> {
        let now = Utc::now();
        self.conn
            .execute(
                "INSERT INTO settings (key, value, kind, description, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    kind = excluded.kind,
                    description = excluded.description,
                    updated_at = excluded.updated_at",
                params![
                    setting.key,
                    setting.value,
                    setting.kind.as_str(),
                    setting.description,
                    now,
                ],
            )
            .map_err(storage)?;

        Ok(Setting {
            updated_at: Some(now),
            ..setting.clone()
        })
    }
}
