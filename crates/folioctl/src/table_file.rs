//! Level table files for offline validation and seeding.
//!
//! Two formats, picked by extension:
//! - `.toml`: one `[[levels]]` table per entry
//! - `.json`: either a bare array or `{ "levels": [...] }`

use anyhow::{bail, Context, Result};
use folio_shared::LevelCandidate;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct LevelFile {
    #[serde(default)]
    levels: Vec<LevelCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonLevels {
    Bare(Vec<LevelCandidate>),
    Wrapped(LevelFile),
}

/// Read candidate levels from `path`
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<LevelCandidate>> {
    let path = path.as_ref();
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => parse_toml(&content).with_context(|| format!("parsing {}", path.display())),
        Some("json") => parse_json(&content).with_context(|| format!("parsing {}", path.display())),
        _ => bail!("{}: expected a .toml or .json file", path.display()),
    }
}

pub fn parse_toml(content: &str) -> Result<Vec<LevelCandidate>> {
    let file: LevelFile = toml::from_str(content)?;
    Ok(file.levels)
}

pub fn parse_json(content: &str) -> Result<Vec<LevelCandidate>> {
    let levels = match serde_json::from_str::<JsonLevels>(content)? {
        JsonLevels::Bare(levels) => levels,
        JsonLevels::Wrapped(file) => file.levels,
    };
    Ok(levels)
}
