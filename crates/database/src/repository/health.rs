use super::codec::{self, decimal, opt_decimal, variant};
use super::{ChildLink, DbRepository, DeleteSummary, SqliteQuery};
use crate::error::DbError;
use crate::schema::{TableSpec, ANIMALS, HEALTH_RECORDS, MEDICINE_INVENTORY};
use core_types::{HealthRecord, MedicineItem, NewHealthRecord, NewMedicineItem, RecordFilter};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

const INSERT_HEALTH: &str = r#"
INSERT INTO health_records (animal_id, date, record_type, diagnosis, treatment, medicine_id, dosage, cost, veterinarian, next_due, notes)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPDATE_HEALTH: &str = r#"
UPDATE health_records
SET animal_id = ?, date = ?, record_type = ?, diagnosis = ?, treatment = ?, medicine_id = ?,
    dosage = ?, cost = ?, veterinarian = ?, next_due = ?, notes = ?
WHERE id = ?
"#;

const INSERT_MEDICINE: &str = r#"
INSERT INTO medicine_inventory (name, category, quantity, unit, expiry_date, cost_per_unit, supplier, reorder_level, notes)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPDATE_MEDICINE: &str = r#"
UPDATE medicine_inventory
SET name = ?, category = ?, quantity = ?, unit = ?, expiry_date = ?, cost_per_unit = ?,
    supplier = ?, reorder_level = ?, notes = ?
WHERE id = ?
"#;

impl DbRepository {
    // --- Health records ---

    pub async fn create_health_record(&self, record: &NewHealthRecord) -> Result<i64, DbError> {
        record.validate()?;
        let query = bind_health(sqlx::query(INSERT_HEALTH), record);
        self.insert_row(&HEALTH_RECORDS, &health_parents(record), query)
            .await
    }

    pub async fn get_health_records(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<HealthRecord>, DbError> {
        self.fetch_filtered(&HEALTH_RECORDS, filter, decode_health)
            .await
    }

    pub async fn get_health_record(&self, id: i64) -> Result<HealthRecord, DbError> {
        self.fetch_by_id(&HEALTH_RECORDS, id, decode_health).await
    }

    pub async fn update_health_record(
        &self,
        id: i64,
        record: &NewHealthRecord,
    ) -> Result<(), DbError> {
        record.validate()?;
        let query = bind_health(sqlx::query(UPDATE_HEALTH), record).bind(id);
        self.update_row(&HEALTH_RECORDS, id, &health_parents(record), query)
            .await
    }

    pub async fn delete_health_record(&self, id: i64) -> Result<DeleteSummary, DbError> {
        self.delete_with_children(&HEALTH_RECORDS, id, &[]).await
    }

    // --- Medicine inventory ---

    pub async fn create_medicine(&self, item: &NewMedicineItem) -> Result<i64, DbError> {
        item.validate()?;
        let query = bind_medicine(sqlx::query(INSERT_MEDICINE), item);
        self.insert_row(&MEDICINE_INVENTORY, &[], query).await
    }

    /// Date bounds apply to the expiry date.
    pub async fn get_medicines(&self, filter: &RecordFilter) -> Result<Vec<MedicineItem>, DbError> {
        self.fetch_filtered(&MEDICINE_INVENTORY, filter, decode_medicine)
            .await
    }

    pub async fn get_medicine(&self, id: i64) -> Result<MedicineItem, DbError> {
        self.fetch_by_id(&MEDICINE_INVENTORY, id, decode_medicine)
            .await
    }

    pub async fn update_medicine(&self, id: i64, item: &NewMedicineItem) -> Result<(), DbError> {
        item.validate()?;
        let query = bind_medicine(sqlx::query(UPDATE_MEDICINE), item).bind(id);
        self.update_row(&MEDICINE_INVENTORY, id, &[], query).await
    }

    /// Removes a medicine from stock. Treatments that used it keep their
    /// history; by default their `medicine_id` is cleared.
    pub async fn delete_medicine(&self, id: i64) -> Result<DeleteSummary, DbError> {
        let links = [ChildLink::new(
            &HEALTH_RECORDS,
            "medicine_id",
            self.cascade.medicine_health,
        )];
        self.delete_with_children(&MEDICINE_INVENTORY, id, &links)
            .await
    }
}

fn health_parents(record: &NewHealthRecord) -> Vec<(&'static TableSpec, i64)> {
    let mut parents = vec![(&ANIMALS, record.animal_id)];
    if let Some(medicine_id) = record.medicine_id {
        parents.push((&MEDICINE_INVENTORY, medicine_id));
    }
    parents
}

fn bind_health<'q>(query: SqliteQuery<'q>, record: &'q NewHealthRecord) -> SqliteQuery<'q> {
    query
        .bind(record.animal_id)
        .bind(record.date)
        .bind(record.record_type.as_str())
        .bind(record.diagnosis.trim())
        .bind(record.treatment.as_deref())
        .bind(record.medicine_id)
        .bind(record.dosage.as_deref())
        .bind(codec::text(record.cost))
        .bind(record.veterinarian.as_deref())
        .bind(record.next_due)
        .bind(record.notes.as_deref())
}

fn decode_health(row: &SqliteRow) -> Result<HealthRecord, DbError> {
    Ok(HealthRecord {
        id: row.try_get("id")?,
        animal_id: row.try_get("animal_id")?,
        date: row.try_get("date")?,
        record_type: variant(row, "record_type")?,
        diagnosis: row.try_get("diagnosis")?,
        treatment: row.try_get("treatment")?,
        medicine_id: row.try_get("medicine_id")?,
        dosage: row.try_get("dosage")?,
        cost: decimal(row, "cost")?,
        veterinarian: row.try_get("veterinarian")?,
        next_due: row.try_get("next_due")?,
        notes: row.try_get("notes")?,
    })
}

fn bind_medicine<'q>(query: SqliteQuery<'q>, item: &'q NewMedicineItem) -> SqliteQuery<'q> {
    query
        .bind(item.name.trim())
        .bind(item.category.trim())
        .bind(codec::text(item.quantity))
        .bind(item.unit.trim())
        .bind(item.expiry_date)
        .bind(codec::opt_text(item.cost_per_unit))
        .bind(item.supplier.as_deref())
        .bind(codec::text(item.reorder_level))
        .bind(item.notes.as_deref())
}

fn decode_medicine(row: &SqliteRow) -> Result<MedicineItem, DbError> {
    Ok(MedicineItem {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        quantity: decimal(row, "quantity")?,
        unit: row.try_get("unit")?,
        expiry_date: row.try_get("expiry_date")?,
        cost_per_unit: opt_decimal(row, "cost_per_unit")?,
        supplier: row.try_get("supplier")?,
        reorder_level: decimal(row, "reorder_level")?,
        notes: row.try_get("notes")?,
    })
}
