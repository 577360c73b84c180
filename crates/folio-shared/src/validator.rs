//! Level table validation
//!
//! Runs on the administrative replace path only, before anything is persisted.
//! Validation is exhaustive: every entry is checked and every problem is reported,
//! so an admin sees the whole list in one round trip.
//!
//! Checks, in report order:
//! 1. per-entry required fields (label, minYears, maxYears, color, description)
//! 2. per-entry numeric sanity (finite, non-negative, min <= max)
//! 3. duplicate labels
//! 4. overlaps between neighbours once sorted by `min_years`
//!    (a shared endpoint counts as an overlap)

use crate::candidate::{LevelCandidate, YearsField};
use crate::error::{FolioError, Result};
use crate::level::LevelRange;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of [`validate`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            ok: errors.is_empty(),
            errors,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// `Err(FolioError::Validation)` carrying every message when not ok
    pub fn into_result(self) -> Result<()> {
        if self.ok {
            Ok(())
        } else {
            Err(FolioError::Validation(self.errors))
        }
    }
}

/// Check a table of stored-form levels. Never mutates the input.
pub fn validate(candidates: &[LevelRange]) -> ValidationReport {
    let entries: Vec<EntryView<'_>> = candidates.iter().map(EntryView::from).collect();
    validate_entries(&entries)
}

/// Check raw submitted levels, reporting missing and mistyped fields too
pub fn validate_candidates(candidates: &[LevelCandidate]) -> ValidationReport {
    let entries: Vec<EntryView<'_>> = candidates.iter().map(EntryView::from).collect();
    validate_entries(&entries)
}

/// The fields every check looks at, borrowed from either input shape
struct EntryView<'a> {
    label: &'a str,
    min: YearsField,
    max: YearsField,
    color: Option<&'a str>,
    description: Option<&'a str>,
}

impl<'a> From<&'a LevelRange> for EntryView<'a> {
    fn from(range: &'a LevelRange) -> Self {
        Self {
            label: &range.label,
            min: YearsField::Value(range.min_years),
            max: YearsField::Value(range.max_years),
            color: Some(&range.color),
            description: Some(&range.description),
        }
    }
}

impl<'a> From<&'a LevelCandidate> for EntryView<'a> {
    fn from(candidate: &'a LevelCandidate) -> Self {
        Self {
            label: candidate.label.as_deref().unwrap_or(""),
            min: candidate.min(),
            max: candidate.max(),
            color: candidate.color.as_deref(),
            description: candidate.description.as_deref(),
        }
    }
}

fn validate_entries(entries: &[EntryView<'_>]) -> ValidationReport {
    let mut errors = Vec::new();

    if entries.is_empty() {
        errors.push("Experience levels must be a non-empty list".to_string());
        return ValidationReport::from_errors(errors);
    }

    for (index, entry) in entries.iter().enumerate() {
        check_entry(index + 1, entry, &mut errors);
    }

    check_duplicates(entries, &mut errors);
    check_overlaps(entries, &mut errors);

    ValidationReport::from_errors(errors)
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn check_entry(number: usize, entry: &EntryView<'_>, errors: &mut Vec<String>) {
    let missing = [
        ("label", is_blank(Some(entry.label))),
        ("minYears", entry.min == YearsField::Missing),
        ("maxYears", entry.max == YearsField::Missing),
        ("color", is_blank(entry.color)),
        ("description", is_blank(entry.description)),
    ];
    for (field, absent) in missing {
        if absent {
            errors.push(format!("Level {} is missing required field: {}", number, field));
        }
    }

    let (Some(min), Some(max)) = (entry.min.finite(), entry.max.finite()) else {
        errors.push(format!(
            "Level {} has invalid numeric values for minYears or maxYears",
            number
        ));
        return;
    };

    if min < 0.0 || max < 0.0 {
        errors.push(format!(
            "Level {} has negative values for minYears or maxYears",
            number
        ));
    } else if min > max {
        errors.push(format!("Level {} has minYears greater than maxYears", number));
    }
}

fn check_duplicates(entries: &[EntryView<'_>], errors: &mut Vec<String>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for entry in entries {
        let label = entry.label.trim();
        if label.is_empty() {
            continue;
        }
        let count = counts.entry(label).or_insert(0);
        if *count == 0 {
            order.push(label);
        }
        *count += 1;
    }

    for label in order {
        if counts[label] > 1 {
            errors.push(format!("Duplicate level label: {}", label));
        }
    }
}

/// Entries without two finite bounds are already reported and take no part here
fn check_overlaps(entries: &[EntryView<'_>], errors: &mut Vec<String>) {
    let mut sorted: Vec<(&str, f64, f64)> = entries
        .iter()
        .filter_map(|e| Some((e.label, e.min.finite()?, e.max.finite()?)))
        .collect();
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1));

    for pair in sorted.windows(2) {
        let ((label, min, max), (next_label, next_min, next_max)) = (pair[0], pair[1]);
        if max >= next_min {
            errors.push(format!(
                "Overlapping ranges: {} ({}-{}) overlaps with {} ({}-{})",
                label, min, max, next_label, next_min, next_max
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelTable;

    #[test]
    fn test_defaults_are_valid() {
        let report = validate(LevelTable::defaults().entries());
        assert!(report.is_ok(), "{:?}", report.errors);
    }

    #[test]
    fn test_overlap_names_both_levels() {
        let report = validate(&[
            LevelRange::new("A", 0.0, 2.0),
            LevelRange::new("B", 1.5, 5.0),
        ]);
        assert!(!report.ok);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(
            report.errors[0],
            "Overlapping ranges: A (0-2) overlaps with B (1.5-5)"
        );
    }

    #[test]
    fn test_adjacent_ranges_accepted() {
        let report = validate(&[
            LevelRange::new("A", 0.0, 2.0),
            LevelRange::new("B", 2.1, 5.0),
        ]);
        assert!(report.ok);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_shared_endpoint_is_overlap() {
        let report = validate(&[
            LevelRange::new("B", 2.0, 5.0),
            LevelRange::new("A", 0.0, 2.0),
        ]);
        assert!(!report.ok);
        assert!(report.errors[0].contains("A (0-2)"));
        assert!(report.errors[0].contains("B (2-5)"));
    }

    #[test]
    fn test_reports_every_problem() {
        let mut missing = LevelRange::new("", 1.0, 2.0);
        missing.color.clear();
        missing.description = "   ".to_string();

        let report = validate(&[
            missing,
            LevelRange::new("Negative", -1.0, 3.0),
            LevelRange::new("Backwards", 9.0, 8.0),
            LevelRange::new("Broken", f64::NAN, 3.0),
        ]);

        assert!(!report.ok);
        assert!(report
            .errors
            .contains(&"Level 1 is missing required field: label".to_string()));
        assert!(report
            .errors
            .contains(&"Level 1 is missing required field: color".to_string()));
        assert!(report
            .errors
            .contains(&"Level 1 is missing required field: description".to_string()));
        assert!(report
            .errors
            .contains(&"Level 2 has negative values for minYears or maxYears".to_string()));
        assert!(report
            .errors
            .contains(&"Level 3 has minYears greater than maxYears".to_string()));
        assert!(report.errors.contains(
            &"Level 4 has invalid numeric values for minYears or maxYears".to_string()
        ));
    }

    #[test]
    fn test_candidates_report_missing_and_mistyped_bounds() {
        let candidates: Vec<LevelCandidate> = serde_json::from_str(
            r##"[
                { "label": "A", "minYears": 0, "color": "#111", "description": "a" },
                { "label": "B", "minYears": "two", "maxYears": 5, "color": "#222", "description": "b" },
                { "label": "C", "minYears": 6, "maxYears": 9, "description": "c" }
            ]"##,
        )
        .unwrap();

        let report = validate_candidates(&candidates);
        assert_eq!(
            report.errors,
            vec![
                "Level 1 is missing required field: maxYears".to_string(),
                "Level 1 has invalid numeric values for minYears or maxYears".to_string(),
                "Level 2 has invalid numeric values for minYears or maxYears".to_string(),
                "Level 3 is missing required field: color".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_rejected() {
        let report = validate(&[]);
        assert!(!report.ok);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_duplicate_labels() {
        let report = validate(&[
            LevelRange::new("Junior", 0.0, 1.0),
            LevelRange::new("Junior", 1.1, 2.0),
        ]);
        assert_eq!(report.errors, vec!["Duplicate level label: Junior".to_string()]);
    }

    #[test]
    fn test_into_result() {
        assert!(validate(LevelTable::defaults().entries()).into_result().is_ok());

        let err = validate(&[]).into_result().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.validation_errors().len(), 1);
    }

    #[test]
    fn test_input_untouched() {
        let candidates = vec![
            LevelRange::new("B", 2.1, 5.0),
            LevelRange::new("A", 0.0, 2.0),
        ];
        let before = candidates.clone();
        let _ = validate(&candidates);
        assert_eq!(candidates, before);
    }
}
