//! Experience engine: clock + start date, applied to a caller-supplied table.

use crate::clock::Clock;
use crate::level::{LevelRange, LevelTable};
use crate::progression::{estimate_in, NextStep, Progression};
use crate::timeline::{build_timeline, TimelineEntry};
use crate::years::compute;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Current experience, computed fresh per request and never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceSnapshot {
    pub years: f64,
    pub start_date: DateTime<Utc>,
    /// Resolved level, `None` when no active range covers `years`
    pub level: Option<LevelRange>,
    pub next_level: Option<NextStep>,
    pub progress_percent: u8,
}

impl ExperienceSnapshot {
    pub fn from_progression(start_date: DateTime<Utc>, progression: Progression) -> Self {
        let next_level = progression.next_step();
        Self {
            years: progression.years,
            start_date,
            level: progression.current_level,
            next_level,
            progress_percent: progression.progress_percent,
        }
    }

    pub fn level_label(&self) -> &str {
        self.level.as_ref().map(|l| l.label.as_str()).unwrap_or("Unknown")
    }
}

#[derive(Clone)]
pub struct ExperienceEngine {
    clock: Arc<dyn Clock>,
    start_date: DateTime<Utc>,
}

impl ExperienceEngine {
    pub fn new(clock: Arc<dyn Clock>, start_date: DateTime<Utc>) -> Self {
        Self { clock, start_date }
    }

    /// Same clock, different start date
    pub fn with_start_date(&self, start_date: DateTime<Utc>) -> Self {
        Self {
            clock: Arc::clone(&self.clock),
            start_date,
        }
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Elapsed years from the start date to now
    pub fn years(&self) -> f64 {
        compute(self.start_date, self.clock.now())
    }

    pub fn snapshot(&self, table: &LevelTable) -> ExperienceSnapshot {
        let progression = estimate_in(self.years(), &table.normalized());
        ExperienceSnapshot::from_progression(self.start_date, progression)
    }

    pub fn timeline(&self, table: &LevelTable) -> Vec<TimelineEntry> {
        build_timeline(self.start_date, table, self.clock.now())
    }
}

impl std::fmt::Debug for ExperienceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExperienceEngine")
            .field("start_date", &self.start_date)
            .field("now", &self.clock.now())
            .finish()
    }
}
