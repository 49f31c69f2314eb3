use super::codec::{self, decimal, opt_decimal, variant};
use super::{ChildLink, DbRepository, DeleteSummary, SqliteQuery};
use crate::error::DbError;
use crate::schema::{ATTENDANCE, WORKERS};
use core_types::{Attendance, NewAttendance, NewWorker, RecordFilter, Worker};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

const INSERT_WORKER: &str = r#"
INSERT INTO workers (name, role, phone, daily_wage, status)
VALUES (?, ?, ?, ?, ?)
"#;

const UPDATE_WORKER: &str = r#"
UPDATE workers
SET name = ?, role = ?, phone = ?, daily_wage = ?, status = ?
WHERE id = ?
"#;

const INSERT_ATTENDANCE: &str = r#"
INSERT INTO attendance (worker_id, date, status, hours, tasks, notes)
VALUES (?, ?, ?, ?, ?, ?)
"#;

const UPDATE_ATTENDANCE: &str = r#"
UPDATE attendance
SET worker_id = ?, date = ?, status = ?, hours = ?, tasks = ?, notes = ?
WHERE id = ?
"#;

impl DbRepository {
    // --- Workers ---

    pub async fn create_worker(&self, worker: &NewWorker) -> Result<i64, DbError> {
        worker.validate()?;
        let query = bind_worker(sqlx::query(INSERT_WORKER), worker);
        self.insert_row(&WORKERS, &[], query).await
    }

    /// Workers carry no date; a filter with date bounds is rejected.
    pub async fn get_workers(&self, filter: &RecordFilter) -> Result<Vec<Worker>, DbError> {
        self.fetch_filtered(&WORKERS, filter, decode_worker).await
    }

    pub async fn get_worker(&self, id: i64) -> Result<Worker, DbError> {
        self.fetch_by_id(&WORKERS, id, decode_worker).await
    }

    pub async fn update_worker(&self, id: i64, worker: &NewWorker) -> Result<(), DbError> {
        worker.validate()?;
        let query = bind_worker(sqlx::query(UPDATE_WORKER), worker).bind(id);
        self.update_row(&WORKERS, id, &[], query).await
    }

    pub async fn delete_worker(&self, id: i64) -> Result<DeleteSummary, DbError> {
        let links = [ChildLink::new(
            &ATTENDANCE,
            "worker_id",
            self.cascade.worker_attendance,
        )];
        self.delete_with_children(&WORKERS, id, &links).await
    }

    // --- Attendance ---

    /// Records one day for one worker. A second entry for the same day is
    /// rejected as a duplicate.
    pub async fn create_attendance(&self, entry: &NewAttendance) -> Result<i64, DbError> {
        entry.validate()?;
        let query = bind_attendance(sqlx::query(INSERT_ATTENDANCE), entry);
        self.insert_row(&ATTENDANCE, &[(&WORKERS, entry.worker_id)], query)
            .await
    }

    pub async fn get_attendances(&self, filter: &RecordFilter) -> Result<Vec<Attendance>, DbError> {
        self.fetch_filtered(&ATTENDANCE, filter, decode_attendance)
            .await
    }

    pub async fn get_attendance(&self, id: i64) -> Result<Attendance, DbError> {
        self.fetch_by_id(&ATTENDANCE, id, decode_attendance).await
    }

    pub async fn update_attendance(&self, id: i64, entry: &NewAttendance) -> Result<(), DbError> {
        entry.validate()?;
        let query = bind_attendance(sqlx::query(UPDATE_ATTENDANCE), entry).bind(id);
        self.update_row(&ATTENDANCE, id, &[(&WORKERS, entry.worker_id)], query)
            .await
    }

    pub async fn delete_attendance(&self, id: i64) -> Result<DeleteSummary, DbError> {
        self.delete_with_children(&ATTENDANCE, id, &[]).await
    }
}

fn bind_worker<'q>(query: SqliteQuery<'q>, worker: &'q NewWorker) -> SqliteQuery<'q> {
    query
        .bind(worker.name.trim())
        .bind(worker.role.trim())
        .bind(worker.phone.as_deref())
        .bind(codec::text(worker.daily_wage))
        .bind(worker.status.as_str())
}

fn decode_worker(row: &SqliteRow) -> Result<Worker, DbError> {
    Ok(Worker {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        role: row.try_get("role")?,
        phone: row.try_get("phone")?,
        daily_wage: decimal(row, "daily_wage")?,
        status: variant(row, "status")?,
    })
}

fn bind_attendance<'q>(query: SqliteQuery<'q>, entry: &'q NewAttendance) -> SqliteQuery<'q> {
    query
        .bind(entry.worker_id)
        .bind(entry.date)
        .bind(entry.status.as_str())
        .bind(codec::opt_text(entry.hours))
        .bind(entry.tasks.as_deref())
        .bind(entry.notes.as_deref())
}

fn decode_attendance(row: &SqliteRow) -> Result<Attendance, DbError> {
    Ok(Attendance {
        id: row.try_get("id")?,
        worker_id: row.try_get("worker_id")?,
        date: row.try_get("date")?,
        status: variant(row, "status")?,
        hours: opt_decimal(row, "hours")?,
        tasks: row.try_get("tasks")?,
        notes: row.try_get("notes")?,
    })
}
