use super::codec::{self, decimal, variant};
use super::{DbRepository, DeleteSummary, SqliteQuery};
use crate::error::DbError;
use crate::schema::FINANCIAL_TRANSACTIONS;
use core_types::{FinancialTransaction, NewFinancialTransaction, RecordFilter};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

const INSERT_TRANSACTION: &str = r#"
INSERT INTO financial_transactions (date, direction, category, subcategory, amount, description, reference_id, notes)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPDATE_TRANSACTION: &str = r#"
UPDATE financial_transactions
SET date = ?, direction = ?, category = ?, subcategory = ?, amount = ?, description = ?,
    reference_id = ?, notes = ?
WHERE id = ?
"#;

impl DbRepository {
    pub async fn create_transaction(&self, entry: &NewFinancialTransaction) -> Result<i64, DbError> {
        entry.validate()?;
        let query = bind_transaction(sqlx::query(INSERT_TRANSACTION), entry);
        self.insert_row(&FINANCIAL_TRANSACTIONS, &[], query).await
    }

    pub async fn get_transactions(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<FinancialTransaction>, DbError> {
        self.fetch_filtered(&FINANCIAL_TRANSACTIONS, filter, decode_transaction)
            .await
    }

    pub async fn get_transaction(&self, id: i64) -> Result<FinancialTransaction, DbError> {
        self.fetch_by_id(&FINANCIAL_TRANSACTIONS, id, decode_transaction)
            .await
    }

    pub async fn update_transaction(
        &self,
        id: i64,
        entry: &NewFinancialTransaction,
    ) -> Result<(), DbError> {
        entry.validate()?;
        let query = bind_transaction(sqlx::query(UPDATE_TRANSACTION), entry).bind(id);
        self.update_row(&FINANCIAL_TRANSACTIONS, id, &[], query)
            .await
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<DeleteSummary, DbError> {
        self.delete_with_children(&FINANCIAL_TRANSACTIONS, id, &[])
            .await
    }
}

fn bind_transaction<'q>(
    query: SqliteQuery<'q>,
    entry: &'q NewFinancialTransaction,
) -> SqliteQuery<'q> {
    query
        .bind(entry.date)
        .bind(entry.direction.as_str())
        .bind(entry.category.trim())
        .bind(entry.subcategory.as_deref())
        .bind(codec::text(entry.amount))
        .bind(entry.description.trim())
        .bind(entry.reference_id.as_deref())
        .bind(entry.notes.as_deref())
}

fn decode_transaction(row: &SqliteRow) -> Result<FinancialTransaction, DbError> {
    Ok(FinancialTransaction {
        id: row.try_get("id")?,
        date: row.try_get("date")?,
        direction: variant(row, "direction")?,
        category: row.try_get("category")?,
        subcategory: row.try_get("subcategory")?,
        amount: decimal(row, "amount")?,
        description: row.try_get("description")?,
        reference_id: row.try_get("reference_id")?,
        notes: row.try_get("notes")?,
    })
}
