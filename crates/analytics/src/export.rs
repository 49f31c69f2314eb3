//! CSV output for entity rows and computed rollups.

use crate::error::AnalyticsError;
use csv::Writer;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Writes `rows` as CSV with a header taken from the field names of `T`.
///
/// `T` must be flat: a struct of scalars, options and unit enums. Returns the
/// number of data rows written. An empty slice writes nothing, not even a
/// header.
pub fn write_csv<T, W>(rows: &[T], writer: W) -> Result<usize, AnalyticsError>
where
    T: Serialize,
    W: Write,
{
    let mut wtr = Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

/// Writes `rows` to the file at `path`, replacing it if it exists.
pub fn export_csv_file<T: Serialize>(rows: &[T], path: &Path) -> Result<usize, AnalyticsError> {
    let file = std::fs::File::create(path)?;
    let written = write_csv(rows, file)?;
    tracing::info!(path = %path.display(), rows = written, "Exported CSV.");
    Ok(written)
}
