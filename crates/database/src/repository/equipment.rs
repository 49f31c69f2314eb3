use super::codec::{self, decimal, variant};
use super::{ChildLink, DbRepository, DeleteSummary, SqliteQuery};
use crate::error::DbError;
use crate::schema::{EQUIPMENT, EQUIPMENT_MAINTENANCE};
use core_types::{Equipment, EquipmentMaintenance, NewEquipment, NewEquipmentMaintenance, RecordFilter};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

const INSERT_EQUIPMENT: &str = r#"
INSERT INTO equipment (name, equipment_type, purchase_date, purchase_cost, status, notes)
VALUES (?, ?, ?, ?, ?, ?)
"#;

const UPDATE_EQUIPMENT: &str = r#"
UPDATE equipment
SET name = ?, equipment_type = ?, purchase_date = ?, purchase_cost = ?, status = ?, notes = ?
WHERE id = ?
"#;

const INSERT_MAINTENANCE: &str = r#"
INSERT INTO equipment_maintenance (equipment_id, date, maintenance_type, description, cost, fuel_litres, hours_used, notes)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPDATE_MAINTENANCE: &str = r#"
UPDATE equipment_maintenance
SET equipment_id = ?, date = ?, maintenance_type = ?, description = ?, cost = ?, fuel_litres = ?,
    hours_used = ?, notes = ?
WHERE id = ?
"#;

impl DbRepository {
    // --- Equipment ---

    pub async fn create_equipment(&self, item: &NewEquipment) -> Result<i64, DbError> {
        item.validate()?;
        let query = bind_equipment(sqlx::query(INSERT_EQUIPMENT), item);
        self.insert_row(&EQUIPMENT, &[], query).await
    }

    /// Date bounds apply to the purchase date; items with no purchase date
    /// are excluded by any bound.
    pub async fn get_equipments(&self, filter: &RecordFilter) -> Result<Vec<Equipment>, DbError> {
        self.fetch_filtered(&EQUIPMENT, filter, decode_equipment)
            .await
    }

    pub async fn get_equipment(&self, id: i64) -> Result<Equipment, DbError> {
        self.fetch_by_id(&EQUIPMENT, id, decode_equipment).await
    }

    pub async fn update_equipment(&self, id: i64, item: &NewEquipment) -> Result<(), DbError> {
        item.validate()?;
        let query = bind_equipment(sqlx::query(UPDATE_EQUIPMENT), item).bind(id);
        self.update_row(&EQUIPMENT, id, &[], query).await
    }

    pub async fn delete_equipment(&self, id: i64) -> Result<DeleteSummary, DbError> {
        let links = [ChildLink::new(
            &EQUIPMENT_MAINTENANCE,
            "equipment_id",
            self.cascade.equipment_maintenance,
        )];
        self.delete_with_children(&EQUIPMENT, id, &links).await
    }

    // --- Maintenance log ---

    pub async fn create_maintenance(
        &self,
        entry: &NewEquipmentMaintenance,
    ) -> Result<i64, DbError> {
        entry.validate()?;
        let query = bind_maintenance(sqlx::query(INSERT_MAINTENANCE), entry);
        self.insert_row(
            &EQUIPMENT_MAINTENANCE,
            &[(&EQUIPMENT, entry.equipment_id)],
            query,
        )
        .await
    }

    pub async fn get_maintenances(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<EquipmentMaintenance>, DbError> {
        self.fetch_filtered(&EQUIPMENT_MAINTENANCE, filter, decode_maintenance)
            .await
    }

    pub async fn get_maintenance(&self, id: i64) -> Result<EquipmentMaintenance, DbError> {
        self.fetch_by_id(&EQUIPMENT_MAINTENANCE, id, decode_maintenance)
            .await
    }

    pub async fn update_maintenance(
        &self,
        id: i64,
        entry: &NewEquipmentMaintenance,
    ) -> Result<(), DbError> {
        entry.validate()?;
        let query = bind_maintenance(sqlx::query(UPDATE_MAINTENANCE), entry).bind(id);
        self.update_row(
            &EQUIPMENT_MAINTENANCE,
            id,
            &[(&EQUIPMENT, entry.equipment_id)],
            query,
        )
        .await
    }

    pub async fn delete_maintenance(&self, id: i64) -> Result<DeleteSummary, DbError> {
        self.delete_with_children(&EQUIPMENT_MAINTENANCE, id, &[])
            .await
    }
}

fn bind_equipment<'q>(query: SqliteQuery<'q>, item: &'q NewEquipment) -> SqliteQuery<'q> {
    query
        .bind(item.name.trim())
        .bind(item.equipment_type.trim())
        .bind(item.purchase_date)
        .bind(codec::text(item.purchase_cost))
        .bind(item.status.as_str())
        .bind(item.notes.as_deref())
}

fn decode_equipment(row: &SqliteRow) -> Result<Equipment, DbError> {
    Ok(Equipment {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        equipment_type: row.try_get("equipment_type")?,
        purchase_date: row.try_get("purchase_date")?,
        purchase_cost: decimal(row, "purchase_cost")?,
        status: variant(row, "status")?,
        notes: row.try_get("notes")?,
    })
}

fn bind_maintenance<'q>(
    query: SqliteQuery<'q>,
    entry: &'q NewEquipmentMaintenance,
) -> SqliteQuery<'q> {
    query
        .bind(entry.equipment_id)
        .bind(entry.date)
        .bind(entry.maintenance_type.trim())
        .bind(entry.description.trim())
        .bind(codec::text(entry.cost))
        .bind(codec::text(entry.fuel_litres))
        .bind(codec::text(entry.hours_used))
        .bind(entry.notes.as_deref())
}

fn decode_maintenance(row: &SqliteRow) -> Result<EquipmentMaintenance, DbError> {
    Ok(EquipmentMaintenance {
        id: row.try_get("id")?,
        equipment_id: row.try_get("equipment_id")?,
        date: row.try_get("date")?,
        maintenance_type: row.try_get("maintenance_type")?,
        description: row.try_get("description")?,
        cost: decimal(row, "cost")?,
        fuel_litres: decimal(row, "fuel_litres")?,
        hours_used: decimal(row, "hours_used")?,
        notes: row.try_get("notes")?,
    })
}
