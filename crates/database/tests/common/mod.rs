#![allow(dead_code)]

use chrono::NaiveDate;
use core_types::{
    AnimalStatus, BreedingEventType, BreedingMethod, HealthRecordType, LifecycleStage,
    MilkSession, MilkUsage, NewAnimal, NewBreedingRecord, NewFeedConsumption, NewFeedInventory,
    NewHealthRecord, NewMedicineItem, NewMilkRecord, Sex,
};
use database::{connect_in_memory, init_schema, DbRepository};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub async fn repo() -> DbRepository {
    let pool = connect_in_memory().await.unwrap();
    init_schema(&pool).await.unwrap();
    DbRepository::new(pool)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn cow(tag: &str) -> NewAnimal {
    NewAnimal {
        tag_id: tag.to_string(),
        name: Some(format!("Cow {tag}")),
        ear_tag: None,
        birth_date: date(2020, 3, 1),
        sex: Sex::Female,
        breed: Some("Sahiwal".into()),
        lifecycle_stage: LifecycleStage::AdultCow,
        status: AnimalStatus::Active,
        sire: None,
        dam: None,
        registration_date: date(2020, 3, 15),
        notes: None,
    }
}

pub fn milk(animal_id: i64, day: NaiveDate, session: MilkSession, litres: Decimal) -> NewMilkRecord {
    NewMilkRecord {
        animal_id,
        date: day,
        session,
        volume_litres: litres,
        usage: MilkUsage::Sale,
        price_per_litre: Some(dec!(52)),
        notes: None,
    }
}

pub fn insemination(animal_id: i64, day: NaiveDate) -> NewBreedingRecord {
    NewBreedingRecord {
        animal_id,
        event_date: day,
        event_type: BreedingEventType::Insemination,
        method: Some(BreedingMethod::Artificial),
        bull_id: Some("HF-221".into()),
        outcome: None,
        calf_tag: None,
        calf_sex: None,
        notes: None,
    }
}

pub fn calving(animal_id: i64, day: NaiveDate) -> NewBreedingRecord {
    NewBreedingRecord {
        animal_id,
        event_date: day,
        event_type: BreedingEventType::Calving,
        method: None,
        bull_id: None,
        outcome: None,
        calf_tag: Some("C-1".into()),
        calf_sex: Some(Sex::Female),
        notes: None,
    }
}

pub fn treatment(animal_id: i64, medicine_id: Option<i64>) -> NewHealthRecord {
    NewHealthRecord {
        animal_id,
        date: date(2025, 5, 2),
        record_type: HealthRecordType::Treatment,
        diagnosis: "Mastitis".into(),
        treatment: Some("Intramammary antibiotic".into()),
        medicine_id,
        dosage: Some("1 tube".into()),
        cost: dec!(450),
        veterinarian: Some("Dr. Rao".into()),
        next_due: Some(date(2025, 5, 9)),
        notes: None,
    }
}

pub fn medicine(name: &str) -> NewMedicineItem {
    NewMedicineItem {
        name: name.to_string(),
        category: "Antibiotic".into(),
        quantity: dec!(12),
        unit: "tube".into(),
        expiry_date: date(2026, 1, 31),
        cost_per_unit: Some(dec!(85.50)),
        supplier: None,
        reorder_level: dec!(5),
        notes: None,
    }
}

pub fn feed(name: &str) -> NewFeedInventory {
    NewFeedInventory {
        feed_name: name.to_string(),
        category: "Concentrate".into(),
        quantity_kg: dec!(500),
        unit_cost: dec!(28),
        purchase_date: date(2025, 4, 20),
        expiry_date: Some(date(2025, 10, 20)),
        supplier: Some("Co-op".into()),
        notes: None,
    }
}

pub fn feeding(feed_id: i64, day: NaiveDate, kg: Decimal) -> NewFeedConsumption {
    NewFeedConsumption {
        feed_id,
        date: day,
        quantity_kg: kg,
        herd_size: 12,
        notes: None,
    }
}
