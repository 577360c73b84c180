//! Progress toward the next level
//!
//! Progress is measured between lower bounds: how far `years` has travelled from
//! the current level's `min_years` toward the next level's `min_years`, as an
//! integer percentage clamped to 0-100. The highest level is always 100%.

use crate::level::{LevelRange, LevelTable, NormalizedTable};
use crate::resolver::resolve_in;
use crate::years::round_tenths;
use serde::{Deserialize, Serialize};

/// Where a years value sits in the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progression {
    pub years: f64,
    pub current_level: Option<LevelRange>,
    pub next_level: Option<LevelRange>,
    pub progress_percent: u8,
}

impl Progression {
    fn unresolved(years: f64) -> Self {
        Self {
            years,
            current_level: None,
            next_level: None,
            progress_percent: 0,
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.current_level.is_some() && self.next_level.is_none()
    }

    /// Summary of the next target, if there is one
    pub fn next_step(&self) -> Option<NextStep> {
        self.next_level.as_ref().map(|next| NextStep {
            label: next.label.clone(),
            years_needed: next.min_years,
            years_remaining: round_tenths((next.min_years - self.years).max(0.0)),
        })
    }
}

/// Distance to the next level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStep {
    pub label: String,
    pub years_needed: f64,
    pub years_remaining: f64,
}

pub fn estimate(years: f64, table: &LevelTable) -> Progression {
    estimate_in(years, &table.normalized())
}

/// Same as [`estimate`] over an already normalized table
pub fn estimate_in(years: f64, table: &NormalizedTable<'_>) -> Progression {
    let Some(current) = resolve_in(years, table) else {
        return Progression::unresolved(years);
    };

    let next = table
        .index_of(current)
        .and_then(|index| table.get(index + 1));

    let Some(next) = next else {
        return Progression {
            years,
            current_level: Some(current.clone()),
            next_level: None,
            progress_percent: 100,
        };
    };

    Progression {
        years,
        current_level: Some(current.clone()),
        next_level: Some(next.clone()),
        progress_percent: percent_between(years, current.min_years, next.min_years),
    }
}

fn percent_between(years: f64, from: f64, to: f64) -> u8 {
    let span = to - from;
    if span == 0.0 {
        return 100;
    }
    let raw = ((years - from) / span * 100.0 + 0.5).floor();
    raw.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn junior_mid() -> LevelTable {
        LevelTable::new(vec![
            LevelRange::new("Junior", 0.6, 2.0),
            LevelRange::new("Mid", 2.1, 5.0),
        ])
    }

    #[test]
    fn test_mid_tier_progress() {
        let progression = estimate(1.3, &junior_mid());
        assert_eq!(progression.current_level.as_ref().unwrap().label, "Junior");
        assert_eq!(progression.next_level.as_ref().unwrap().label, "Mid");
        // (1.3 - 0.6) / (2.1 - 0.6) = 46.7%
        assert_eq!(progression.progress_percent, 47);
    }

    #[test]
    fn test_top_tier_is_complete() {
        let progression = estimate(3.0, &junior_mid());
        assert_eq!(progression.current_level.as_ref().unwrap().label, "Mid");
        assert!(progression.next_level.is_none());
        assert_eq!(progression.progress_percent, 100);
        assert!(progression.is_top_level());
        assert!(progression.next_step().is_none());
    }

    #[test]
    fn test_unresolved() {
        let progression = estimate(2.05, &junior_mid());
        assert!(progression.current_level.is_none());
        assert!(progression.next_level.is_none());
        assert_eq!(progression.progress_percent, 0);

        let empty = estimate(1.0, &LevelTable::default());
        assert_eq!(empty.progress_percent, 0);
    }

    #[test]
    fn test_lower_bound_is_zero_percent() {
        assert_eq!(estimate(0.6, &junior_mid()).progress_percent, 0);
    }

    #[test]
    fn test_upper_bound_stays_below_full() {
        // 2.0 is (2.0 - 0.6) / (2.1 - 0.6) = 93.3%
        assert_eq!(estimate(2.0, &junior_mid()).progress_percent, 93);
    }

    #[test]
    fn test_next_step() {
        let step = estimate(1.3, &junior_mid()).next_step().unwrap();
        assert_eq!(step.label, "Mid");
        assert_eq!(step.years_needed, 2.1);
        assert_eq!(step.years_remaining, 0.8);
    }

    #[test]
    fn test_zero_width_gap_guard() {
        assert_eq!(percent_between(1.0, 1.0, 1.0), 100);
        assert_eq!(percent_between(5.0, 0.0, 4.0), 100);
        assert_eq!(percent_between(-1.0, 0.0, 4.0), 0);
    }

    #[test]
    fn test_inactive_skipped_for_next_level() {
        let table = LevelTable::new(vec![
            LevelRange::new("Junior", 0.6, 2.0),
            LevelRange::new("Retired", 2.1, 3.0).inactive(),
            LevelRange::new("Senior", 3.1, 5.0),
        ]);
        let progression = estimate(1.0, &table);
        assert_eq!(progression.next_level.unwrap().label, "Senior");
    }

    #[test]
    fn test_repeated_label_uses_resolved_entry() {
        let table = LevelTable::new(vec![
            LevelRange::new("Engineer", 0.0, 2.0),
            LevelRange::new("Engineer", 3.0, 5.0),
            LevelRange::new("Staff", 6.0, 8.0),
        ]);
        let progression = estimate(4.0, &table);
        assert_eq!(progression.current_level.unwrap().min_years, 3.0);
        assert_eq!(progression.next_level.unwrap().label, "Staff");
        assert_eq!(progression.progress_percent, 33);
    }

    #[test]
    fn test_idempotent() {
        let table = LevelTable::defaults();
        assert_eq!(estimate(7.3, &table), estimate(7.3, &table));
    }
}
