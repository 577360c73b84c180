//! Persistence collaborators
//!
//! The engine never touches storage. Daemon and CLI hand it a freshly loaded
//! [`LevelTable`] per call; writes go through [`replace_levels`], which refuses to
//! touch the store unless the whole candidate set validates.

use crate::error::Result;
use crate::level::{LevelRange, LevelTable};
use crate::validator::validate;
use crate::years::parse_date;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Settings key holding the career start date
pub const EXPERIENCE_START_KEY: &str = "experienceStartDate";

pub trait LevelStore {
    /// Every stored level, active or not, in insertion order
    fn load_table(&self) -> Result<LevelTable>;

    /// Upsert each candidate by label. Labels not in `candidates` are left as they are.
    /// Returns the number of rows written.
    fn replace_table(&self, candidates: &[LevelRange]) -> Result<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    #[default]
    String,
    Number,
    Boolean,
    Object,
}

impl SettingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKind::String => "string",
            SettingKind::Number => "number",
            SettingKind::Boolean => "boolean",
            SettingKind::Object => "object",
        }
    }

    /// Unknown names fall back to `String`
    pub fn parse(name: &str) -> Self {
        match name {
            "number" => SettingKind::Number,
            "boolean" => SettingKind::Boolean,
            "object" => SettingKind::Object,
            _ => SettingKind::String,
        }
    }
}

/// A key/value site setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub key: String,
    pub value: String,
    #[serde(rename = "type", default)]
    pub kind: SettingKind,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Setting {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            kind: SettingKind::String,
            description: String::new(),
            updated_at: None,
        }
    }
}

pub trait SettingsStore {
    fn get_setting(&self, key: &str) -> Result<Option<Setting>>;

    fn list_settings(&self) -> Result<Vec<Setting>>;

    /// Insert or overwrite by key; returns the stored row
    fn set_setting(&self, setting: &Setting) -> Result<Setting>;
}

/// Validate `candidates` as a whole, then hand them to the store.
///
/// On validation failure nothing is written and the error carries every message.
pub fn replace_levels<S: LevelStore + ?Sized>(
    store: &S,
    candidates: &[LevelRange],
) -> Result<usize> {
    validate(candidates).into_result()?;
    let written = store.replace_table(candidates)?;
    info!("Replaced experience levels ({} written)", written);
    Ok(written)
}

/// Configured start date, or `fallback` when the setting is unset or unreadable
pub fn start_date_or<S: SettingsStore + ?Sized>(
    store: &S,
    fallback: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
    let Some(setting) = store.get_setting(EXPERIENCE_START_KEY)? else {
        return Ok(fallback);
    };

    match parse_date(&setting.value) {
        Ok(date) => Ok(date),
        Err(e) => {
            warn!("Ignoring stored {}: {}", EXPERIENCE_START_KEY, e);
            Ok(fallback)
        }
    }
}
