use chrono::NaiveDate;
use configuration::error::ConfigError;
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Foreign key violation on {table}: {reason}")]
    ForeignKey { table: &'static str, reason: String },

    #[error("No {entity} with id {id} exists.")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Storage is not configured: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Stored value in column '{column}' could not be decoded: {reason}")]
    Corrupt { column: &'static str, reason: String },
}

impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { field, reason } => DbError::Validation { field, reason },
            CoreError::InvalidRange { start, end } => DbError::InvalidRange { start, end },
            CoreError::UnknownVariant { kind, value } => DbError::Validation {
                field: kind,
                reason: format!("unknown value '{value}'"),
            },
        }
    }
}

/// Translates a failed write into the error taxonomy.
///
/// Constraint violations reported by the store become `ForeignKey` or
/// `Validation` errors; everything else stays a `Storage` error.
pub(crate) fn write_error(table: &'static str) -> impl FnOnce(sqlx::Error) -> DbError {
    move |err| {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return DbError::ForeignKey {
                    table,
                    reason: db_err.message().to_string(),
                };
            }
            if db_err.is_unique_violation() {
                return DbError::Validation {
                    field: table,
                    reason: format!("duplicate entry ({})", db_err.message()),
                };
            }
            if db_err.is_check_violation() {
                return DbError::Validation {
                    field: table,
                    reason: db_err.message().to_string(),
                };
            }
        }
        DbError::Storage(err)
    }
}
