//! Experience level table
//!
//! A level is a labeled, closed interval of elapsed years (`[min_years, max_years]`)
//! plus display metadata the engine never interprets (color, icon).
//!
//! Tables are kept in insertion order. Every consumer goes through
//! [`LevelTable::normalized`], which drops inactive entries and sorts the rest by
//! `min_years` once, so resolution, progression and timelines share one ordering.

use serde::{Deserialize, Serialize};

/// Seed table: (label, min_years, max_years, color, icon, description)
pub const DEFAULT_LEVELS: &[(&str, f64, f64, &str, &str, &str)] = &[
    (
        "Intern",
        0.0,
        0.5,
        "#94a3b8",
        "User",
        "Entry-level position with basic understanding of industry practices",
    ),
    (
        "Junior",
        0.6,
        2.0,
        "#3b82f6",
        "User",
        "Developing technical skills with guidance from senior team members",
    ),
    (
        "Mid-Level",
        2.1,
        5.0,
        "#22c55e",
        "Briefcase",
        "Independent contributor with solid technical expertise and problem-solving skills",
    ),
    (
        "Senior",
        5.1,
        10.0,
        "#f59e0b",
        "Briefcase",
        "Experienced professional who mentors others and drives technical decisions",
    ),
    (
        "Lead",
        10.1,
        15.0,
        "#ef4444",
        "Shield",
        "Technical leader who shapes architecture and guides team direction",
    ),
    (
        "Principal",
        15.1,
        25.0,
        "#a855f7",
        "Crown",
        "Industry expert who influences technology strategy and innovation",
    ),
    (
        "Architect",
        25.1,
        999.0,
        "#06b6d4",
        "Building",
        "Visionary leader who designs complex systems and drives organizational change",
    ),
];

fn default_icon() -> String {
    "Briefcase".to_string()
}

fn default_active() -> bool {
    true
}

/// One entry of a level table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelRange {
    /// Unique tier name (older clients send it as `level`)
    #[serde(alias = "level")]
    pub label: String,
    /// Inclusive lower bound in years
    pub min_years: f64,
    /// Inclusive upper bound in years
    pub max_years: f64,
    #[serde(default)]
    pub color: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    /// Inactive ranges stay in storage but never resolve
    #[serde(default = "default_active", alias = "isActive")]
    pub active: bool,
}

impl LevelRange {
    pub fn new(label: &str, min_years: f64, max_years: f64) -> Self {
        Self {
            label: label.to_string(),
            min_years,
            max_years,
            color: "#667eea".to_string(),
            icon: default_icon(),
            description: format!("{} level", label),
            active: true,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Inclusive containment on both ends
    pub fn contains(&self, years: f64) -> bool {
        years >= self.min_years && years <= self.max_years
    }

    /// "0.6-2" style range text used in messages
    pub fn range_text(&self) -> String {
        format!("{}-{}", self.min_years, self.max_years)
    }
}

/// Insertion-ordered collection of levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelTable {
    entries: Vec<LevelRange>,
}

impl LevelTable {
    pub fn new(entries: Vec<LevelRange>) -> Self {
        Self { entries }
    }

    /// The seven-tier table the site ships with
    pub fn defaults() -> Self {
        let entries = DEFAULT_LEVELS
            .iter()
            .map(|&(label, min, max, color, icon, description)| {
                LevelRange::new(label, min, max)
                    .with_color(color)
                    .with_icon(icon)
                    .with_description(description)
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[LevelRange] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<LevelRange> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, range: LevelRange) {
        self.entries.push(range);
    }

    pub fn get(&self, label: &str) -> Option<&LevelRange> {
        self.entries.iter().find(|r| r.label == label)
    }

    /// Active entries sorted by `min_years` ascending.
    ///
    /// The sort is stable: entries with equal lower bounds keep insertion order.
    pub fn normalized(&self) -> NormalizedTable<'_> {
        let mut entries: Vec<&LevelRange> = self.entries.iter().filter(|r| r.active).collect();
        entries.sort_by(|a, b| a.min_years.total_cmp(&b.min_years));
        NormalizedTable { entries }
    }
}

impl From<Vec<LevelRange>> for LevelTable {
    fn from(entries: Vec<LevelRange>) -> Self {
        Self::new(entries)
    }
}

impl FromIterator<LevelRange> for LevelTable {
    fn from_iter<I: IntoIterator<Item = LevelRange>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Borrowed view of a table: active entries only, sorted by `min_years`
#[derive(Debug, Clone)]
pub struct NormalizedTable<'a> {
    entries: Vec<&'a LevelRange>,
}

impl<'a> NormalizedTable<'a> {
    pub fn entries(&self) -> &[&'a LevelRange] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted index of this exact entry; labels are not assumed unique
    pub fn index_of(&self, range: &LevelRange) -> Option<usize> {
        self.entries.iter().position(|r| std::ptr::eq(*r, range))
    }

    pub fn get(&self, index: usize) -> Option<&'a LevelRange> {
        self.entries.get(index).copied()
    }

    /// Owned copies in sorted order, for responses
    pub fn to_vec(&self) -> Vec<LevelRange> {
        self.entries.iter().map(|r| (*r).clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_shape() {
        let table = LevelTable::defaults();
        assert_eq!(table.len(), 7);
        assert_eq!(table.entries()[0].label, "Intern");
        assert_eq!(table.entries()[6].label, "Architect");
        assert!(table.entries().iter().all(|r| r.active));
        assert_eq!(table.get("Senior").unwrap().icon, "Briefcase");
    }

    #[test]
    fn test_normalized_sorts_and_filters() {
        let table = LevelTable::new(vec![
            LevelRange::new("Senior", 5.1, 10.0),
            LevelRange::new("Hidden", 0.0, 0.5).inactive(),
            LevelRange::new("Junior", 0.6, 2.0),
        ]);

        let normalized = table.normalized();
        let labels: Vec<&str> = normalized.entries().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Junior", "Senior"]);
        assert_eq!(normalized.index_of(&table.entries()[0]), Some(1));
        assert_eq!(normalized.index_of(&table.entries()[1]), None);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let senior = LevelRange::new("Senior", 5.1, 10.0);
        assert!(senior.contains(5.1));
        assert!(senior.contains(10.0));
        assert!(!senior.contains(5.09));
        assert!(!senior.contains(10.01));
    }

    #[test]
    fn test_deserialize_legacy_field_names() {
        let json = r##"{
            "level": "Lead",
            "minYears": 10.1,
            "maxYears": 15,
            "color": "#ef4444",
            "description": "Technical leader",
            "isActive": false
        }"##;
        let range: LevelRange = serde_json::from_str(json).unwrap();
        assert_eq!(range.label, "Lead");
        assert_eq!(range.max_years, 15.0);
        assert_eq!(range.icon, "Briefcase");
        assert!(!range.active);
    }

    #[test]
    fn test_serialize_camel_case() {
        let value = serde_json::to_value(LevelRange::new("Junior", 0.6, 2.0)).unwrap();
        assert_eq!(value["minYears"], 0.6);
        assert_eq!(value["maxYears"], 2.0);
        assert_eq!(value["active"], true);
    }
}
