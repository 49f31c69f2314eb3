use chrono::NaiveDate;
use core_types::DateRange;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("CSV export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("I/O error during export: {0}")]
    Io(#[from] std::io::Error),
}

/// The inclusive reporting period `start..=end`.
pub(crate) fn period(start: NaiveDate, end: NaiveDate) -> Result<DateRange, AnalyticsError> {
    DateRange::new(start, end).map_err(|_| AnalyticsError::InvalidRange { start, end })
}
