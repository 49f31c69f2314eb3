use crate::error::{write_error, DbError};
use crate::schema::{TableSpec, TABLES};
use configuration::{CascadePolicy, ChildPolicy};
use core_types::RecordFilter;
use serde::Serialize;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

mod codec;
mod equipment;
mod feed;
mod finance;
mod health;
mod herd;
mod labour;

pub(crate) type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the farm store. It encapsulates all SQL queries and data access logic.
///
/// Each public method acquires a connection from the pool for the duration of
/// one operation and returns it on every exit path.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: SqlitePool,
    cascade: CascadePolicy,
}

/// What a parent delete did to one child table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildEffect {
    pub table: &'static str,
    pub policy: ChildPolicy,
    /// Rows deleted (cascade) or unlinked (detach). Always zero for restrict.
    pub rows: u64,
}

/// The result of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    pub entity: &'static str,
    pub id: i64,
    pub children: Vec<ChildEffect>,
}

impl DeleteSummary {
    /// Rows affected in `table`, or zero if the delete did not touch it.
    pub fn rows_in(&self, table: &str) -> u64 {
        self.children
            .iter()
            .filter(|child| child.table == table)
            .map(|child| child.rows)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table: &'static str,
    pub rows: i64,
}

/// A foreign key pointing at the row being deleted.
pub(crate) struct ChildLink {
    spec: &'static TableSpec,
    column: &'static str,
    policy: ChildPolicy,
}

impl ChildLink {
    pub(crate) fn new(spec: &'static TableSpec, column: &'static str, policy: ChildPolicy) -> Self {
        Self {
            spec,
            column,
            policy,
        }
    }
}

impl DbRepository {
    /// Creates a new `DbRepository` with the default cascade policy.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            cascade: CascadePolicy::default(),
        }
    }

    /// Replaces the delete policy after checking it.
    ///
    /// A policy that would detach a mandatory reference is refused with
    /// `DbError::Configuration` here, before any delete can reach the store.
    pub fn with_cascade_policy(mut self, cascade: CascadePolicy) -> Result<Self, DbError> {
        cascade.validate()?;
        self.cascade = cascade;
        Ok(self)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn cascade_policy(&self) -> &CascadePolicy {
        &self.cascade
    }

    /// Row counts for every table, in schema order.
    pub async fn table_counts(&self) -> Result<Vec<TableCount>, DbError> {
        let mut counts = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            let sql = format!("SELECT COUNT(*) FROM {table}");
            let rows: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
            counts.push(TableCount { table, rows });
        }
        Ok(counts)
    }

    /// Runs a `SELECT` over `spec` restricted by `filter`.
    async fn fetch_filtered<T>(
        &self,
        spec: &TableSpec,
        filter: &RecordFilter,
        decode: fn(&SqliteRow) -> Result<T, DbError>,
    ) -> Result<Vec<T>, DbError> {
        filter.validate()?;

        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM {} WHERE 1 = 1",
            spec.columns, spec.table
        ));

        if filter.from.is_some() || filter.to.is_some() {
            let column = spec.date_column.ok_or_else(|| DbError::Validation {
                field: "from",
                reason: format!("{} rows have no date to filter on", spec.entity),
            })?;
            if let Some(from) = filter.from {
                query.push(format!(" AND {column} >= ")).push_bind(from);
            }
            if let Some(to) = filter.to {
                query.push(format!(" AND {column} <= ")).push_bind(to);
            }
        }

        if let Some(parent_id) = filter.parent_id {
            let column = spec.parent_column.ok_or_else(|| DbError::Validation {
                field: "parent_id",
                reason: format!("{} rows have no parent record", spec.entity),
            })?;
            query.push(format!(" AND {column} = ")).push_bind(parent_id);
        }

        match (spec.time_series, spec.date_column) {
            (true, Some(column)) => query.push(format!(" ORDER BY {column} DESC, id DESC")),
            _ => query.push(" ORDER BY id ASC"),
        };

        let rows = query.build().fetch_all(&self.pool).await?;
        tracing::debug!(table = spec.table, rows = rows.len(), "Fetched rows.");
        rows.iter().map(decode).collect()
    }

    async fn fetch_by_id<T>(
        &self,
        spec: &TableSpec,
        id: i64,
        decode: fn(&SqliteRow) -> Result<T, DbError>,
    ) -> Result<T, DbError> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?", spec.columns, spec.table);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound {
                entity: spec.entity,
                id,
            })?;
        decode(&row)
    }

    /// Inserts one row after checking that every referenced parent exists.
    async fn insert_row(
        &self,
        spec: &TableSpec,
        parents: &[(&TableSpec, i64)],
        query: SqliteQuery<'_>,
    ) -> Result<i64, DbError> {
        let mut tx = self.pool.begin().await?;
        for &(parent, parent_id) in parents {
            ensure_parent(&mut tx, spec, parent, parent_id).await?;
        }
        let id = query
            .execute(&mut *tx)
            .await
            .map_err(write_error(spec.table))?
            .last_insert_rowid();
        tx.commit().await?;

        tracing::info!(entity = spec.entity, id, "Created record.");
        Ok(id)
    }

    /// Replaces one row. The query must bind the row id as its last parameter.
    async fn update_row(
        &self,
        spec: &TableSpec,
        id: i64,
        parents: &[(&TableSpec, i64)],
        query: SqliteQuery<'_>,
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        ensure_row(&mut tx, spec, id).await?;
        for &(parent, parent_id) in parents {
            ensure_parent(&mut tx, spec, parent, parent_id).await?;
        }
        query
            .execute(&mut *tx)
            .await
            .map_err(write_error(spec.table))?;
        tx.commit().await?;

        tracing::info!(entity = spec.entity, id, "Updated record.");
        Ok(())
    }

    /// Deletes one row, applying `links` to its children first.
    ///
    /// Restricting links are all checked before anything is modified, so a
    /// refused delete never leaves a partially cascaded state behind.
    async fn delete_with_children(
        &self,
        spec: &TableSpec,
        id: i64,
        links: &[ChildLink],
    ) -> Result<DeleteSummary, DbError> {
        let mut tx = self.pool.begin().await?;
        ensure_row(&mut tx, spec, id).await?;

        for link in links.iter().filter(|l| l.policy == ChildPolicy::Restrict) {
            let sql = format!(
                "SELECT COUNT(*) FROM {} WHERE {} = ?",
                link.spec.table, link.column
            );
            let count: i64 = sqlx::query_scalar(&sql).bind(id).fetch_one(&mut *tx).await?;
            if count > 0 {
                tracing::warn!(
                    entity = spec.entity,
                    id,
                    child = link.spec.table,
                    count,
                    "Refusing delete: restricted children exist."
                );
                return Err(DbError::ForeignKey {
                    table: link.spec.table,
                    reason: format!(
                        "{} {} is still referenced by {} {} row(s)",
                        spec.entity, id, count, link.spec.entity
                    ),
                });
            }
        }

        let mut children = Vec::with_capacity(links.len());
        for link in links {
            let rows = match link.policy {
                ChildPolicy::Restrict => 0,
                ChildPolicy::Cascade => {
                    let sql = format!("DELETE FROM {} WHERE {} = ?", link.spec.table, link.column);
                    sqlx::query(&sql).bind(id).execute(&mut *tx).await?.rows_affected()
                }
                ChildPolicy::Detach => {
                    let sql = format!(
                        "UPDATE {table} SET {column} = NULL WHERE {column} = ?",
                        table = link.spec.table,
                        column = link.column
                    );
                    sqlx::query(&sql).bind(id).execute(&mut *tx).await?.rows_affected()
                }
            };
            children.push(ChildEffect {
                table: link.spec.table,
                policy: link.policy,
                rows,
            });
        }

        let sql = format!("DELETE FROM {} WHERE id = ?", spec.table);
        sqlx::query(&sql)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(write_error(spec.table))?;
        tx.commit().await?;

        tracing::info!(entity = spec.entity, id, ?children, "Deleted record.");
        Ok(DeleteSummary {
            entity: spec.entity,
            id,
            children,
        })
    }
}

async fn row_exists(conn: &mut SqliteConnection, table: &str, id: i64) -> Result<bool, DbError> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?)");
    let found: bool = sqlx::query_scalar(&sql).bind(id).fetch_one(&mut *conn).await?;
    Ok(found)
}

async fn ensure_row(conn: &mut SqliteConnection, spec: &TableSpec, id: i64) -> Result<(), DbError> {
    if !row_exists(conn, spec.table, id).await? {
        return Err(DbError::NotFound {
            entity: spec.entity,
            id,
        });
    }
    Ok(())
}

async fn ensure_parent(
    conn: &mut SqliteConnection,
    child: &TableSpec,
    parent: &TableSpec,
    parent_id: i64,
) -> Result<(), DbError> {
    if !row_exists(conn, parent.table, parent_id).await? {
        return Err(DbError::ForeignKey {
            table: child.table,
            reason: format!("{} {} does not exist", parent.entity, parent_id),
        });
    }
    Ok(())
}
