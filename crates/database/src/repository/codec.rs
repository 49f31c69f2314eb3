//! Conversions between column values and the typed fields of `core-types`.

use crate::error::DbError;
use core_types::CoreError;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

pub(crate) fn decimal(row: &SqliteRow, column: &'static str) -> Result<Decimal, DbError> {
    let raw: String = row.try_get(column)?;
    parse_decimal(column, &raw)
}

pub(crate) fn opt_decimal(
    row: &SqliteRow,
    column: &'static str,
) -> Result<Option<Decimal>, DbError> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|value| parse_decimal(column, &value)).transpose()
}

fn parse_decimal(column: &'static str, raw: &str) -> Result<Decimal, DbError> {
    Decimal::from_str(raw).map_err(|e| DbError::Corrupt {
        column,
        reason: format!("'{raw}' is not a decimal: {e}"),
    })
}

pub(crate) fn variant<T>(row: &SqliteRow, column: &'static str) -> Result<T, DbError>
where
    T: FromStr<Err = CoreError>,
{
    let raw: String = row.try_get(column)?;
    parse_variant(column, &raw)
}

pub(crate) fn opt_variant<T>(row: &SqliteRow, column: &'static str) -> Result<Option<T>, DbError>
where
    T: FromStr<Err = CoreError>,
{
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|value| parse_variant(column, &value)).transpose()
}

fn parse_variant<T>(column: &'static str, raw: &str) -> Result<T, DbError>
where
    T: FromStr<Err = CoreError>,
{
    raw.parse::<T>().map_err(|e| DbError::Corrupt {
        column,
        reason: e.to_string(),
    })
}

/// Storage form of a decimal value.
pub(crate) fn text(value: Decimal) -> String {
    value.to_string()
}

pub(crate) fn opt_text(value: Option<Decimal>) -> Option<String> {
    value.map(text)
}
