//! Animals and their milk and breeding records.

use super::codec::{self, decimal, opt_decimal, opt_variant, variant};
use super::{ChildLink, DbRepository, DeleteSummary, SqliteQuery};
use crate::error::DbError;
use crate::schema::{ANIMALS, BREEDING_RECORDS, HEALTH_RECORDS, MILK_RECORDS};
use core_types::{
    Animal, BreedingRecord, MilkRecord, NewAnimal, NewBreedingRecord, NewMilkRecord, RecordFilter,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

const INSERT_ANIMAL: &str = r#"
INSERT INTO animals (tag_id, name, ear_tag, birth_date, sex, breed, lifecycle_stage, status, sire, dam, registration_date, notes)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPDATE_ANIMAL: &str = r#"
UPDATE animals
SET tag_id = ?, name = ?, ear_tag = ?, birth_date = ?, sex = ?, breed = ?, lifecycle_stage = ?,
    status = ?, sire = ?, dam = ?, registration_date = ?, notes = ?
WHERE id = ?
"#;

const INSERT_MILK: &str = r#"
INSERT INTO milk_records (animal_id, date, session, volume_litres, usage, price_per_litre, notes)
VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

const UPDATE_MILK: &str = r#"
UPDATE milk_records
SET animal_id = ?, date = ?, session = ?, volume_litres = ?, usage = ?, price_per_litre = ?, notes = ?
WHERE id = ?
"#;

const INSERT_BREEDING: &str = r#"
INSERT INTO breeding_records (animal_id, event_date, event_type, method, bull_id, outcome, calf_tag, calf_sex, notes)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPDATE_BREEDING: &str = r#"
UPDATE breeding_records
SET animal_id = ?, event_date = ?, event_type = ?, method = ?, bull_id = ?, outcome = ?,
    calf_tag = ?, calf_sex = ?, notes = ?
WHERE id = ?
"#;

/// Inseminations with no calving recorded on or after them for the same animal.
const PENDING_CALVINGS: &str = r#"
SELECT b.id, b.animal_id, b.event_date, b.event_type, b.method, b.bull_id, b.outcome, b.calf_tag, b.calf_sex, b.notes
FROM breeding_records b
WHERE b.event_type = 'insemination'
  AND NOT EXISTS (
      SELECT 1 FROM breeding_records c
      WHERE c.animal_id = b.animal_id
        AND c.event_type = 'calving'
        AND c.event_date >= b.event_date
  )
ORDER BY b.event_date ASC, b.id ASC
"#;

impl DbRepository {
    // --- Animals ---

    pub async fn create_animal(&self, animal: &NewAnimal) -> Result<i64, DbError> {
        animal.validate()?;
        let query = bind_animal(sqlx::query(INSERT_ANIMAL), animal);
        self.insert_row(&ANIMALS, &[], query).await
    }

    pub async fn get_animals(&self, filter: &RecordFilter) -> Result<Vec<Animal>, DbError> {
        self.fetch_filtered(&ANIMALS, filter, decode_animal).await
    }

    pub async fn get_animal(&self, id: i64) -> Result<Animal, DbError> {
        self.fetch_by_id(&ANIMALS, id, decode_animal).await
    }

    /// Looks an animal up by its farm tag. Surrounding whitespace is ignored.
    pub async fn find_animal_by_tag(&self, tag_id: &str) -> Result<Option<Animal>, DbError> {
        let sql = format!("SELECT {} FROM animals WHERE tag_id = ?", ANIMALS.columns);
        let row = sqlx::query(&sql)
            .bind(tag_id.trim())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(decode_animal).transpose()
    }

    pub async fn update_animal(&self, id: i64, animal: &NewAnimal) -> Result<(), DbError> {
        animal.validate()?;
        let query = bind_animal(sqlx::query(UPDATE_ANIMAL), animal).bind(id);
        self.update_row(&ANIMALS, id, &[], query).await
    }

    /// Deletes an animal. Milk, breeding and health records follow the
    /// configured `animal_*` policies.
    pub async fn delete_animal(&self, id: i64) -> Result<DeleteSummary, DbError> {
        let links = [
            ChildLink::new(&MILK_RECORDS, "animal_id", self.cascade.animal_milk),
            ChildLink::new(&BREEDING_RECORDS, "animal_id", self.cascade.animal_breeding),
            ChildLink::new(&HEALTH_RECORDS, "animal_id", self.cascade.animal_health),
        ];
        self.delete_with_children(&ANIMALS, id, &links).await
    }

    // --- Milk records ---

    pub async fn create_milk_record(&self, record: &NewMilkRecord) -> Result<i64, DbError> {
        record.validate()?;
        let query = bind_milk(sqlx::query(INSERT_MILK), record);
        self.insert_row(&MILK_RECORDS, &[(&ANIMALS, record.animal_id)], query)
            .await
    }

    pub async fn get_milk_records(&self, filter: &RecordFilter) -> Result<Vec<MilkRecord>, DbError> {
        self.fetch_filtered(&MILK_RECORDS, filter, decode_milk).await
    }

    pub async fn get_milk_record(&self, id: i64) -> Result<MilkRecord, DbError> {
        self.fetch_by_id(&MILK_RECORDS, id, decode_milk).await
    }

    pub async fn update_milk_record(&self, id: i64, record: &NewMilkRecord) -> Result<(), DbError> {
        record.validate()?;
        let query = bind_milk(sqlx::query(UPDATE_MILK), record).bind(id);
        self.update_row(&MILK_RECORDS, id, &[(&ANIMALS, record.animal_id)], query)
            .await
    }

    pub async fn delete_milk_record(&self, id: i64) -> Result<DeleteSummary, DbError> {
        self.delete_with_children(&MILK_RECORDS, id, &[]).await
    }

    // --- Breeding records ---

    pub async fn create_breeding_record(&self, record: &NewBreedingRecord) -> Result<i64, DbError> {
        record.validate()?;
        let query = bind_breeding(sqlx::query(INSERT_BREEDING), record);
        self.insert_row(&BREEDING_RECORDS, &[(&ANIMALS, record.animal_id)], query)
            .await
    }

    pub async fn get_breeding_records(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<BreedingRecord>, DbError> {
        self.fetch_filtered(&BREEDING_RECORDS, filter, decode_breeding)
            .await
    }

    pub async fn get_breeding_record(&self, id: i64) -> Result<BreedingRecord, DbError> {
        self.fetch_by_id(&BREEDING_RECORDS, id, decode_breeding).await
    }

    pub async fn update_breeding_record(
        &self,
        id: i64,
        record: &NewBreedingRecord,
    ) -> Result<(), DbError> {
        record.validate()?;
        let query = bind_breeding(sqlx::query(UPDATE_BREEDING), record).bind(id);
        self.update_row(&BREEDING_RECORDS, id, &[(&ANIMALS, record.animal_id)], query)
            .await
    }

    pub async fn delete_breeding_record(&self, id: i64) -> Result<DeleteSummary, DbError> {
        self.delete_with_children(&BREEDING_RECORDS, id, &[]).await
    }

    /// Inseminations still waiting for a calving, oldest first.
    pub async fn get_pending_calvings(&self) -> Result<Vec<BreedingRecord>, DbError> {
        let rows = sqlx::query(PENDING_CALVINGS).fetch_all(&self.pool).await?;
        rows.iter().map(decode_breeding).collect()
    }
}

fn bind_animal<'q>(query: SqliteQuery<'q>, animal: &'q NewAnimal) -> SqliteQuery<'q> {
    query
        .bind(animal.tag_id.trim())
        .bind(animal.name.as_deref())
        .bind(animal.ear_tag.as_deref())
        .bind(animal.birth_date)
        .bind(animal.sex.as_str())
        .bind(animal.breed.as_deref())
        .bind(animal.lifecycle_stage.as_str())
        .bind(animal.status.as_str())
        .bind(animal.sire.as_deref())
        .bind(animal.dam.as_deref())
        .bind(animal.registration_date)
        .bind(animal.notes.as_deref())
}

fn decode_animal(row: &SqliteRow) -> Result<Animal, DbError> {
    Ok(Animal {
        id: row.try_get("id")?,
        tag_id: row.try_get("tag_id")?,
        name: row.try_get("name")?,
        ear_tag: row.try_get("ear_tag")?,
        birth_date: row.try_get("birth_date")?,
        sex: variant(row, "sex")?,
        breed: row.try_get("breed")?,
        lifecycle_stage: variant(row, "lifecycle_stage")?,
        status: variant(row, "status")?,
        sire: row.try_get("sire")?,
        dam: row.try_get("dam")?,
        registration_date: row.try_get("registration_date")?,
        notes: row.try_get("notes")?,
    })
}

fn bind_milk<'q>(query: SqliteQuery<'q>, record: &'q NewMilkRecord) -> SqliteQuery<'q> {
    query
        .bind(record.animal_id)
        .bind(record.date)
        .bind(record.session.as_str())
        .bind(codec::text(record.volume_litres))
        .bind(record.usage.as_str())
        .bind(codec::opt_text(record.price_per_litre))
        .bind(record.notes.as_deref())
}

fn decode_milk(row: &SqliteRow) -> Result<MilkRecord, DbError> {
    Ok(MilkRecord {
        id: row.try_get("id")?,
        animal_id: row.try_get("animal_id")?,
        date: row.try_get("date")?,
        session: variant(row, "session")?,
        volume_litres: decimal(row, "volume_litres")?,
        usage: variant(row, "usage")?,
        price_per_litre: opt_decimal(row, "price_per_litre")?,
        notes: row.try_get("notes")?,
    })
}

fn bind_breeding<'q>(query: SqliteQuery<'q>, record: &'q NewBreedingRecord) -> SqliteQuery<'q> {
    query
        .bind(record.animal_id)
        .bind(record.event_date)
        .bind(record.event_type.as_str())
        .bind(record.method.map(|m| m.as_str()))
        .bind(record.bull_id.as_deref())
        .bind(record.outcome.map(|o| o.as_str()))
        .bind(record.calf_tag.as_deref())
        .bind(record.calf_sex.map(|s| s.as_str()))
        .bind(record.notes.as_deref())
}

fn decode_breeding(row: &SqliteRow) -> Result<BreedingRecord, DbError> {
    Ok(BreedingRecord {
        id: row.try_get("id")?,
        animal_id: row.try_get("animal_id")?,
        event_date: row.try_get("event_date")?,
        event_type: variant(row, "event_type")?,
        method: opt_variant(row, "method")?,
        bull_id: row.try_get("bull_id")?,
        outcome: opt_variant(row, "outcome")?,
        calf_tag: row.try_get("calf_tag")?,
        calf_sex: opt_variant(row, "calf_sex")?,
        notes: row.try_get("notes")?,
    })
}
