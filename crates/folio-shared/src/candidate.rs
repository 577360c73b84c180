//! Unchecked level input
//!
//! Admin submissions and table files arrive as [`LevelCandidate`]s: every field
//! is optional and the year bounds are kept as raw JSON values, so a missing or
//! mistyped field becomes a validation message instead of a parse failure.

use crate::error::{FolioError, Result};
use crate::level::LevelRange;
use crate::validator::validate_candidates;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelCandidate {
    #[serde(default, alias = "level")]
    pub label: Option<String>,
    #[serde(default)]
    pub min_years: Option<Value>,
    #[serde(default)]
    pub max_years: Option<Value>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "isActive")]
    pub active: Option<bool>,
}

/// State of a submitted year bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YearsField {
    Missing,
    NotANumber,
    Value(f64),
}

impl YearsField {
    fn from_json(value: Option<&Value>) -> Self {
        match value {
            None => YearsField::Missing,
            Some(Value::Number(n)) => n.as_f64().map_or(YearsField::NotANumber, YearsField::Value),
            Some(_) => YearsField::NotANumber,
        }
    }

    /// The value when it is a finite number
    pub fn finite(self) -> Option<f64> {
        match self {
            YearsField::Value(v) if v.is_finite() => Some(v),
            _ => None,
        }
    }
}

impl LevelCandidate {
    pub fn min(&self) -> YearsField {
        YearsField::from_json(self.min_years.as_ref())
    }

    pub fn max(&self) -> YearsField {
        YearsField::from_json(self.max_years.as_ref())
    }

    /// The stored form, if every required field is usable
    pub fn to_range(&self) -> Option<LevelRange> {
        let label = self.label.as_deref().filter(|s| !s.trim().is_empty())?;
        let mut range = LevelRange::new(label, self.min().finite()?, self.max().finite()?);
        range.color = self.color.clone()?;
        range.description = self.description.clone()?;
        if let Some(icon) = self.icon.as_deref().filter(|s| !s.trim().is_empty()) {
            range.icon = icon.to_string();
        }
        range.active = self.active.unwrap_or(true);
        Some(range)
    }
}

impl From<&LevelRange> for LevelCandidate {
    fn from(range: &LevelRange) -> Self {
        Self {
            label: Some(range.label.clone()),
            min_years: serde_json::Number::from_f64(range.min_years).map(Value::Number),
            max_years: serde_json::Number::from_f64(range.max_years).map(Value::Number),
            color: Some(range.color.clone()),
            icon: Some(range.icon.clone()),
            description: Some(range.description.clone()),
            active: Some(range.active),
        }
    }
}

/// Validate `candidates` as a whole and convert them.
///
/// Fails with every validation message when any entry is unusable.
pub fn accept(candidates: &[LevelCandidate]) -> Result<Vec<LevelRange>> {
    validate_candidates(candidates).into_result()?;
    candidates
        .iter()
        .map(LevelCandidate::to_range)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| FolioError::Validation(vec!["Level list contains unusable entries".into()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> LevelCandidate {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_lenient_parse() {
        let candidate = parse(json!({ "level": "Lead", "minYears": "ten" }));
        assert_eq!(candidate.label.as_deref(), Some("Lead"));
        assert_eq!(candidate.min(), YearsField::NotANumber);
        assert_eq!(candidate.max(), YearsField::Missing);
        assert!(candidate.to_range().is_none());
    }

    #[test]
    fn test_to_range_defaults() {
        let candidate = parse(json!({
            "label": "Junior",
            "minYears": 0,
            "maxYears": 2,
            "color": "#3b82f6",
            "description": "Learning"
        }));
        let range = candidate.to_range().unwrap();
        assert_eq!(range.min_years, 0.0);
        assert_eq!(range.icon, "Briefcase");
        assert!(range.active);
    }

    #[test]
    fn test_accept_reports_every_problem() {
        let err = accept(&[
            parse(json!({ "label": "A", "minYears": 0, "color": "#111", "description": "a" })),
            parse(json!({ "label": "B", "minYears": -1, "maxYears": 5, "color": "", "description": "b" })),
        ])
        .unwrap_err();

        let errors = err.validation_errors();
        assert!(errors.contains(&"Level 1 is missing required field: maxYears".to_string()));
        assert!(errors
            .contains(&"Level 1 has invalid numeric values for minYears or maxYears".to_string()));
        assert!(errors.contains(&"Level 2 is missing required field: color".to_string()));
        assert!(errors
            .contains(&"Level 2 has negative values for minYears or maxYears".to_string()));
    }

    #[test]
    fn test_accept_roundtrips_ranges() {
        let table = crate::level::LevelTable::defaults();
        let candidates: Vec<LevelCandidate> = table.entries().iter().map(Into::into).collect();
        assert_eq!(accept(&candidates).unwrap(), table.into_entries());
    }
}
