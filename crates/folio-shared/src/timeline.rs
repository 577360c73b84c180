//! Year-by-year experience timeline

use crate::level::{LevelRange, LevelTable};
use crate::resolver::resolve_in;
use crate::years::{compute, start_of_year};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Experience as of January 1st of `year`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub year: i32,
    pub years: f64,
    pub level: Option<LevelRange>,
    pub date: DateTime<Utc>,
}

/// One entry per calendar year from the start year through the year of `now`.
///
/// Empty when `start` is after `now`.
pub fn build_timeline(
    start: DateTime<Utc>,
    table: &LevelTable,
    now: DateTime<Utc>,
) -> Vec<TimelineEntry> {
    if start > now {
        return Vec::new();
    }

    let normalized = table.normalized();

    (start.year()..=now.year())
        .filter_map(|year| {
            let date = start_of_year(year)?;
            let years = compute(start, date);
            Some(TimelineEntry {
                year,
                years,
                level: resolve_in(years, &normalized).cloned(),
                date,
            })
        })
        .collect()
}
