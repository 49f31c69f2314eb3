// Create/read/update/delete behaviour of the repository against an
// in-memory store.

mod common;

use common::*;
use core_types::{
    AttendanceStatus, CropStatus, Direction, EquipmentStatus, MilkSession, NewAttendance,
    NewEquipment, NewEquipmentMaintenance, NewFinancialTransaction, NewFodderCultivation,
    NewWorker, RecordFilter, WorkerStatus,
};
use database::{init_schema, schema_tables, DbError, TABLES};
use rust_decimal_macros::dec;

#[tokio::test]
async fn schema_init_is_idempotent() {
    let repo = repo().await;
    init_schema(repo.pool()).await.unwrap();

    let mut expected: Vec<String> = TABLES.iter().map(|t| t.to_string()).collect();
    expected.sort();
    assert_eq!(schema_tables(repo.pool()).await.unwrap(), expected);
}

#[tokio::test]
async fn animal_round_trip_and_lookup_by_tag() {
    let repo = repo().await;
    let id = repo.create_animal(&cow("A-101")).await.unwrap();

    let stored = repo.get_animal(id).await.unwrap();
    assert_eq!(stored.tag_id, "A-101");
    assert_eq!(stored.breed.as_deref(), Some("Sahiwal"));
    assert!(stored.is_active());

    let found = repo.find_animal_by_tag(" A-101 ").await.unwrap();
    assert_eq!(found.map(|a| a.id), Some(id));
    assert!(repo.find_animal_by_tag("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_tag_is_a_validation_error() {
    let repo = repo().await;
    repo.create_animal(&cow("A-1")).await.unwrap();
    let err = repo.create_animal(&cow("A-1")).await.unwrap_err();
    assert!(matches!(err, DbError::Validation { .. }), "{err:?}");
}

#[tokio::test]
async fn blank_tag_never_reaches_storage() {
    let repo = repo().await;
    let err = repo.create_animal(&cow("  ")).await.unwrap_err();
    assert!(matches!(err, DbError::Validation { field: "tag_id", .. }));
    assert!(repo.get_animals(&RecordFilter::all()).await.unwrap().is_empty());
}

#[tokio::test]
async fn milk_for_missing_animal_is_rejected_and_nothing_is_written() {
    let repo = repo().await;
    let err = repo
        .create_milk_record(&milk(42, date(2025, 5, 1), MilkSession::Morning, dec!(8)))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::ForeignKey { table: "milk_records", .. }));
    assert!(repo.get_milk_records(&RecordFilter::all()).await.unwrap().is_empty());
}

#[tokio::test]
async fn milk_records_filter_by_range_and_come_back_newest_first() {
    let repo = repo().await;
    let a = repo.create_animal(&cow("A-1")).await.unwrap();
    let b = repo.create_animal(&cow("A-2")).await.unwrap();
    for day in 1..=5 {
        repo.create_milk_record(&milk(a, date(2025, 5, day), MilkSession::Morning, dec!(7.5)))
            .await
            .unwrap();
    }
    repo.create_milk_record(&milk(b, date(2025, 5, 3), MilkSession::Evening, dec!(6)))
        .await
        .unwrap();

    let window = RecordFilter::between(date(2025, 5, 2), date(2025, 5, 4));
    let rows = repo.get_milk_records(&window).await.unwrap();
    let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![date(2025, 5, 4), date(2025, 5, 3), date(2025, 5, 3), date(2025, 5, 2)]
    );

    let only_a = RecordFilter::all().for_parent(a);
    assert_eq!(repo.get_milk_records(&only_a).await.unwrap().len(), 5);
}

#[tokio::test]
async fn reversed_range_is_rejected() {
    let repo = repo().await;
    let filter = RecordFilter::between(date(2025, 6, 1), date(2025, 5, 1));
    let err = repo.get_transactions(&filter).await.unwrap_err();
    assert!(matches!(err, DbError::InvalidRange { .. }));
}

#[tokio::test]
async fn empty_tables_return_empty_lists() {
    let repo = repo().await;
    assert!(repo.get_health_records(&RecordFilter::all()).await.unwrap().is_empty());
    assert!(repo.get_attendances(&RecordFilter::all()).await.unwrap().is_empty());
    assert!(repo.get_pending_calvings().await.unwrap().is_empty());
}

#[tokio::test]
async fn date_filter_on_workers_is_rejected() {
    let repo = repo().await;
    let filter = RecordFilter::between(date(2025, 1, 1), date(2025, 2, 1));
    let err = repo.get_workers(&filter).await.unwrap_err();
    assert!(matches!(err, DbError::Validation { .. }));
}

#[tokio::test]
async fn update_replaces_the_row_and_missing_ids_are_not_found() {
    let repo = repo().await;
    let id = repo.create_animal(&cow("A-1")).await.unwrap();

    let mut changed = cow("A-1");
    changed.breed = Some("Gir".into());
    repo.update_animal(id, &changed).await.unwrap();
    assert_eq!(repo.get_animal(id).await.unwrap().breed.as_deref(), Some("Gir"));

    let err = repo.update_animal(id + 100, &changed).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { entity: "animal", .. }));
    let err = repo.delete_milk_record(7).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { entity: "milk record", id: 7 }));
}

#[tokio::test]
async fn health_record_with_unknown_medicine_is_rejected() {
    let repo = repo().await;
    let animal = repo.create_animal(&cow("A-1")).await.unwrap();
    let err = repo
        .create_health_record(&treatment(animal, Some(99)))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::ForeignKey { table: "health_records", .. }));

    let id = repo.create_health_record(&treatment(animal, None)).await.unwrap();
    assert_eq!(repo.get_health_record(id).await.unwrap().cost, dec!(450));
}

#[tokio::test]
async fn pending_calvings_exclude_inseminations_followed_by_calving() {
    let repo = repo().await;
    let calved = repo.create_animal(&cow("A-1")).await.unwrap();
    let waiting = repo.create_animal(&cow("A-2")).await.unwrap();

    repo.create_breeding_record(&insemination(calved, date(2024, 3, 1)))
        .await
        .unwrap();
    repo.create_breeding_record(&calving(calved, date(2024, 12, 8)))
        .await
        .unwrap();
    let open = repo
        .create_breeding_record(&insemination(waiting, date(2025, 2, 10)))
        .await
        .unwrap();

    let pending = repo.get_pending_calvings().await.unwrap();
    assert_eq!(pending.iter().map(|r| r.id).collect::<Vec<_>>(), vec![open]);
}

#[tokio::test]
async fn reference_entities_round_trip() {
    let repo = repo().await;

    let crop = repo
        .create_fodder(&NewFodderCultivation {
            crop_type: "Napier".into(),
            plot_id: "North-2".into(),
            area_acres: dec!(1.25),
            sowing_date: date(2025, 3, 1),
            harvest_date: None,
            yield_kg: dec!(0),
            cost: dec!(3200),
            status: CropStatus::Growing,
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(repo.get_fodder(crop).await.unwrap().area_acres, dec!(1.25));

    let worker = repo
        .create_worker(&NewWorker {
            name: "Ramesh".into(),
            role: "Milker".into(),
            phone: None,
            daily_wage: dec!(600),
            status: WorkerStatus::Active,
        })
        .await
        .unwrap();
    repo.create_attendance(&NewAttendance {
        worker_id: worker,
        date: date(2025, 5, 1),
        status: AttendanceStatus::HalfDay,
        hours: Some(dec!(4)),
        tasks: None,
        notes: None,
    })
    .await
    .unwrap();
    let rows = repo
        .get_attendances(&RecordFilter::all().for_parent(worker))
        .await
        .unwrap();
    assert_eq!(rows[0].status, AttendanceStatus::HalfDay);

    let tractor = repo
        .create_equipment(&NewEquipment {
            name: "Tractor".into(),
            equipment_type: "Vehicle".into(),
            purchase_date: Some(date(2022, 8, 1)),
            purchase_cost: dec!(650000),
            status: EquipmentStatus::Operational,
            notes: None,
        })
        .await
        .unwrap();
    repo.create_maintenance(&NewEquipmentMaintenance {
        equipment_id: tractor,
        date: date(2025, 4, 11),
        maintenance_type: "Service".into(),
        description: "Oil change".into(),
        cost: dec!(2400),
        fuel_litres: dec!(0),
        hours_used: dec!(3.5),
        notes: None,
    })
    .await
    .unwrap();
    assert_eq!(repo.get_maintenances(&RecordFilter::all()).await.unwrap().len(), 1);

    let sale = repo
        .create_transaction(&NewFinancialTransaction {
            date: date(2025, 5, 1),
            direction: Direction::Income,
            category: "Milk Sales".into(),
            subcategory: None,
            amount: dec!(12500.75),
            description: "Dairy co-op payout".into(),
            reference_id: Some("INV-88".into()),
            notes: None,
        })
        .await
        .unwrap();
    let stored = repo.get_transaction(sale).await.unwrap();
    assert_eq!(stored.amount, dec!(12500.75));
    assert_eq!(stored.direction, Direction::Income);

    let counts = repo.table_counts().await.unwrap();
    let rows_in = |table: &str| counts.iter().find(|c| c.table == table).map(|c| c.rows);
    assert_eq!(rows_in("workers"), Some(1));
    assert_eq!(rows_in("animals"), Some(0));
}
