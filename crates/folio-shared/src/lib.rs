//! Shared types and the experience-level engine for Folio components.
//!
//! Everything here is pure: the level table comes in as a value on every call and
//! nothing is cached or mutated. Storage and time are reached through the
//! [`store::LevelStore`], [`store::SettingsStore`] and [`clock::Clock`] traits.

pub mod candidate;
pub mod clock;
pub mod engine;
pub mod error;
pub mod level;
pub mod progression;
pub mod resolver;
pub mod store;
pub mod timeline;
pub mod validator;
pub mod years;

pub use candidate::{LevelCandidate, YearsField};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{ExperienceEngine, ExperienceSnapshot};
pub use error::FolioError;
pub use level::{LevelRange, LevelTable, NormalizedTable, DEFAULT_LEVELS};
pub use progression::{estimate, NextStep, Progression};
pub use resolver::resolve;
pub use store::{
    replace_levels, start_date_or, LevelStore, Setting, SettingKind, SettingsStore,
    EXPERIENCE_START_KEY,
};
pub use timeline::{build_timeline, TimelineEntry};
pub use validator::{validate, validate_candidates, ValidationReport};

/// Start date used when no `experienceStartDate` setting exists
pub const DEFAULT_START_DATE: &str = "2019-01-01";
