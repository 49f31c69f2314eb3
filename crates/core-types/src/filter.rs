use crate::error::CoreError;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// An inclusive range of calendar days. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A single day.
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// The `days` calendar days ending on (and including) `today`.
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        Self {
            start: today - Duration::days(span),
            end: today,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Row selection for the `get_*` operations of the data access layer.
///
/// Both bounds are inclusive and optional. A filter whose `from` is after its
/// `to` is rejected when the query runs, not silently treated as empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub parent_id: Option<i64>,
}

impl RecordFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            parent_id: None,
        }
    }

    pub fn in_range(range: &DateRange) -> Self {
        Self::between(range.start(), range.end())
    }

    pub fn for_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if let (Some(start), Some(end)) = (self.from, self.to) {
            DateRange::new(start, end)?;
        }
        Ok(())
    }
}
