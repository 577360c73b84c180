//! Engine property tests.
//!
//! Exercise the public API end to end: years → level → progression → timeline,
//! against the default table and small hand-built tables.

use chrono::{DateTime, Duration, TimeZone, Utc};
use folio_shared::{
    build_timeline, estimate, resolve, validate, years, ExperienceEngine, FixedClock, LevelRange,
    LevelTable,
};
use std::sync::Arc;

fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

// ============================================================================
// Resolution
// ============================================================================

/// A validated table never has two active ranges covering the same value
#[test]
fn test_valid_table_covers_each_value_at_most_once() {
    let table = LevelTable::defaults();
    assert!(validate(table.entries()).ok);

    let mut tenths = 0u32;
    while tenths <= 10_000 {
        let y = tenths as f64 / 10.0;
        let covering = table
            .entries()
            .iter()
            .filter(|r| r.active && r.contains(y))
            .count();
        assert!(covering <= 1, "{} ranges cover {}", covering, y);

        if covering == 1 {
            assert!(resolve(y, &table).unwrap().contains(y));
        } else {
            assert!(resolve(y, &table).is_none());
        }
        tenths += 1;
    }
}

#[test]
fn test_default_table_tiers() {
    let table = LevelTable::defaults();
    let cases = [
        (0.0, "Intern"),
        (0.5, "Intern"),
        (0.6, "Junior"),
        (2.0, "Junior"),
        (3.4, "Mid-Level"),
        (5.1, "Senior"),
        (12.0, "Lead"),
        (20.0, "Principal"),
        (40.0, "Architect"),
    ];
    for (y, label) in cases {
        assert_eq!(resolve(y, &table).unwrap().label, label, "years = {}", y);
    }
    assert!(resolve(0.55, &table).is_none());
    assert!(resolve(1000.0, &table).is_none());
}

#[test]
fn test_resolve_and_estimate_are_idempotent() {
    let table = LevelTable::defaults();
    for y in [0.0, 1.3, 7.7, 30.0, 0.55] {
        assert_eq!(resolve(y, &table), resolve(y, &table));
        assert_eq!(estimate(y, &table), estimate(y, &table));
    }
}

// ============================================================================
// Years
// ============================================================================

#[test]
fn test_future_start_is_zero_years() {
    let now = utc(2024, 5, 5);
    assert_eq!(years::compute(now + Duration::days(30), now), 0.0);
}

#[test]
fn test_730_and_a_half_days_is_two_years() {
    let start = utc(2021, 3, 1);
    let reference = start + Duration::hours(730 * 24 + 12);
    assert_eq!(years::compute(start, reference), 2.0);
}

#[test]
fn test_years_always_have_one_decimal() {
    let start = utc(2015, 1, 1);
    for days in (0..4000).step_by(37) {
        let y = years::compute(start, start + Duration::days(days));
        let scaled = y * 10.0;
        assert!((scaled - scaled.round()).abs() < 1e-9, "{} has extra digits", y);
    }
}

// ============================================================================
// Progression
// ============================================================================

#[test]
fn test_progression_walks_the_default_table() {
    let table = LevelTable::defaults();

    let junior = estimate(1.3, &table);
    assert_eq!(junior.current_level.unwrap().label, "Junior");
    assert_eq!(junior.next_level.unwrap().label, "Mid-Level");
    // (1.3 - 0.6) / (2.1 - 0.6) = 46.7%
    assert_eq!(junior.progress_percent, 47);

    let architect = estimate(30.0, &table);
    assert_eq!(architect.current_level.unwrap().label, "Architect");
    assert!(architect.next_level.is_none());
    assert_eq!(architect.progress_percent, 100);
}

#[test]
fn test_progression_percent_bounds() {
    let table = LevelTable::defaults();
    let mut tenths = 0u32;
    while tenths <= 3_000 {
        let p = estimate(tenths as f64 / 10.0, &table);
        assert!(p.progress_percent <= 100);
        tenths += 1;
    }
}

#[test]
fn test_deactivated_top_tier_moves_the_ceiling() {
    let mut entries = LevelTable::defaults().into_entries();
    for range in entries.iter_mut() {
        if range.label == "Architect" {
            range.active = false;
        }
    }
    let table = LevelTable::new(entries);

    let principal = estimate(20.0, &table);
    assert_eq!(principal.current_level.unwrap().label, "Principal");
    assert!(principal.next_level.is_none());
    assert_eq!(principal.progress_percent, 100);
    assert!(resolve(30.0, &table).is_none());
}

// ============================================================================
// Timeline + engine
// ============================================================================

#[test]
fn test_timeline_2019_to_2024() {
    let timeline = build_timeline(utc(2019, 1, 1), &LevelTable::defaults(), utc(2024, 11, 30));
    let years: Vec<i32> = timeline.iter().map(|e| e.year).collect();
    assert_eq!(years, vec![2019, 2020, 2021, 2022, 2023, 2024]);
    assert!(timeline.windows(2).all(|w| w[0].years <= w[1].years));
}

#[test]
fn test_engine_snapshot_serializes_camel_case() {
    let engine = ExperienceEngine::new(Arc::new(FixedClock(utc(2020, 4, 1))), utc(2019, 1, 1));
    let table = LevelTable::new(vec![
        LevelRange::new("Junior", 0.6, 2.0),
        LevelRange::new("Mid", 2.1, 5.0),
    ]);

    let snapshot = engine.snapshot(&table);
    assert_eq!(snapshot.years, 1.2);

    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["level"]["label"], "Junior");
    assert_eq!(value["nextLevel"]["label"], "Mid");
    assert_eq!(value["nextLevel"]["yearsNeeded"], 2.1);
    assert_eq!(value["progressPercent"], 40);
    assert!(value["startDate"].as_str().unwrap().starts_with("2019-01-01"));
}
