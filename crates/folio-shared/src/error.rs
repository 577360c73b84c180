//! Error types for Folio.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    /// Rejected level table. Carries every problem found, in discovery order.
    #[error("Invalid experience level configuration: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl FolioError {
    /// Validation messages, empty for every other variant
    pub fn validation_errors(&self) -> &[String] {
        match self {
            FolioError::Validation(errors) => errors,
            _ => &[],
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FolioError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
