use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

impl CoreError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        CoreError::Validation {
            field,
            reason: reason.into(),
        }
    }
}
