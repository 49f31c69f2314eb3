//! Table definitions for the farm store.
//!
//! Every statement is `IF NOT EXISTS`, so [`init_schema`] can run on every
//! start-up. Decimal columns are stored as TEXT to keep the exact value the
//! farm entered; the `CHECK` constraints back up the validation done in
//! `core-types` before any write.

use crate::error::DbError;
use sqlx::SqlitePool;

/// DDL in dependency order: parents before the tables that reference them.
pub const SCHEMA: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS animals (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    tag_id            TEXT NOT NULL UNIQUE,
    name              TEXT,
    ear_tag           TEXT,
    birth_date        TEXT NOT NULL,
    sex               TEXT NOT NULL CHECK (sex IN ('female', 'male')),
    breed             TEXT,
    lifecycle_stage   TEXT NOT NULL CHECK (lifecycle_stage IN ('calf', 'heifer', 'adult_cow', 'bull')),
    status            TEXT NOT NULL CHECK (status IN ('active', 'sold', 'deceased')),
    sire              TEXT,
    dam               TEXT,
    registration_date TEXT NOT NULL,
    notes             TEXT
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_animals_birth_date ON animals(birth_date)",
    r#"
CREATE TABLE IF NOT EXISTS milk_records (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    animal_id       INTEGER NOT NULL REFERENCES animals(id),
    date            TEXT NOT NULL,
    session         TEXT NOT NULL CHECK (session IN ('morning', 'evening')),
    volume_litres   TEXT NOT NULL CHECK (CAST(volume_litres AS REAL) >= 0),
    usage           TEXT NOT NULL CHECK (usage IN ('sale', 'home_use', 'calf_feeding')),
    price_per_litre TEXT CHECK (price_per_litre IS NULL OR CAST(price_per_litre AS REAL) >= 0),
    notes           TEXT,
    UNIQUE (animal_id, date, session)
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_milk_records_animal ON milk_records(animal_id)",
    "CREATE INDEX IF NOT EXISTS idx_milk_records_date ON milk_records(date)",
    r#"
CREATE TABLE IF NOT EXISTS breeding_records (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    animal_id  INTEGER NOT NULL REFERENCES animals(id),
    event_date TEXT NOT NULL,
    event_type TEXT NOT NULL CHECK (event_type IN ('heat', 'insemination', 'pregnancy_check', 'calving')),
    method     TEXT CHECK (method IS NULL OR method IN ('natural', 'artificial')),
    bull_id    TEXT,
    outcome    TEXT CHECK (outcome IS NULL OR outcome IN ('pending', 'confirmed', 'failed', 'live_calf', 'stillborn')),
    calf_tag   TEXT,
    calf_sex   TEXT CHECK (calf_sex IS NULL OR calf_sex IN ('female', 'male')),
    notes      TEXT
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_breeding_records_animal ON breeding_records(animal_id)",
    "CREATE INDEX IF NOT EXISTS idx_breeding_records_date ON breeding_records(event_date)",
    r#"
CREATE TABLE IF NOT EXISTS medicine_inventory (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL UNIQUE,
    category      TEXT NOT NULL,
    quantity      TEXT NOT NULL CHECK (CAST(quantity AS REAL) >= 0),
    unit          TEXT NOT NULL,
    expiry_date   TEXT NOT NULL,
    cost_per_unit TEXT CHECK (cost_per_unit IS NULL OR CAST(cost_per_unit AS REAL) >= 0),
    supplier      TEXT,
    reorder_level TEXT NOT NULL CHECK (CAST(reorder_level AS REAL) >= 0),
    notes         TEXT
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_medicine_inventory_expiry ON medicine_inventory(expiry_date)",
    r#"
CREATE TABLE IF NOT EXISTS health_records (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    animal_id    INTEGER NOT NULL REFERENCES animals(id),
    date         TEXT NOT NULL,
    record_type  TEXT NOT NULL CHECK (record_type IN ('vaccination', 'treatment', 'checkup', 'deworming')),
    diagnosis    TEXT NOT NULL,
    treatment    TEXT,
    medicine_id  INTEGER REFERENCES medicine_inventory(id),
    dosage       TEXT,
    cost         TEXT NOT NULL CHECK (CAST(cost AS REAL) >= 0),
    veterinarian TEXT,
    next_due     TEXT,
    notes        TEXT
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_health_records_animal ON health_records(animal_id)",
    "CREATE INDEX IF NOT EXISTS idx_health_records_medicine ON health_records(medicine_id)",
    "CREATE INDEX IF NOT EXISTS idx_health_records_date ON health_records(date)",
    r#"
CREATE TABLE IF NOT EXISTS fodder_cultivation (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    crop_type    TEXT NOT NULL,
    plot_id      TEXT NOT NULL,
    area_acres   TEXT NOT NULL CHECK (CAST(area_acres AS REAL) >= 0),
    sowing_date  TEXT NOT NULL,
    harvest_date TEXT,
    yield_kg     TEXT NOT NULL CHECK (CAST(yield_kg AS REAL) >= 0),
    cost         TEXT NOT NULL CHECK (CAST(cost AS REAL) >= 0),
    status       TEXT NOT NULL CHECK (status IN ('sowing', 'growing', 'ready_for_harvest', 'harvested')),
    notes        TEXT
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_fodder_cultivation_sowing ON fodder_cultivation(sowing_date)",
    r#"
CREATE TABLE IF NOT EXISTS feed_inventory (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    feed_name     TEXT NOT NULL,
    category      TEXT NOT NULL,
    quantity_kg   TEXT NOT NULL CHECK (CAST(quantity_kg AS REAL) >= 0),
    unit_cost     TEXT NOT NULL CHECK (CAST(unit_cost AS REAL) >= 0),
    purchase_date TEXT NOT NULL,
    expiry_date   TEXT,
    supplier      TEXT,
    notes         TEXT
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_feed_inventory_purchase ON feed_inventory(purchase_date)",
    r#"
CREATE TABLE IF NOT EXISTS feed_consumption (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    feed_id     INTEGER NOT NULL REFERENCES feed_inventory(id),
    date        TEXT NOT NULL,
    quantity_kg TEXT NOT NULL CHECK (CAST(quantity_kg AS REAL) >= 0),
    herd_size   INTEGER NOT NULL CHECK (herd_size >= 0),
    notes       TEXT
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_feed_consumption_feed ON feed_consumption(feed_id)",
    "CREATE INDEX IF NOT EXISTS idx_feed_consumption_date ON feed_consumption(date)",
    r#"
CREATE TABLE IF NOT EXISTS workers (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    role       TEXT NOT NULL,
    phone      TEXT,
    daily_wage TEXT NOT NULL CHECK (CAST(daily_wage AS REAL) >= 0),
    status     TEXT NOT NULL CHECK (status IN ('active', 'inactive'))
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS attendance (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    worker_id INTEGER NOT NULL REFERENCES workers(id),
    date      TEXT NOT NULL,
    status    TEXT NOT NULL CHECK (status IN ('present', 'absent', 'half_day', 'leave')),
    hours     TEXT CHECK (hours IS NULL OR CAST(hours AS REAL) >= 0),
    tasks     TEXT,
    notes     TEXT,
    UNIQUE (worker_id, date)
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_attendance_worker ON attendance(worker_id)",
    "CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date)",
    r#"
CREATE TABLE IF NOT EXISTS equipment (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    name           TEXT NOT NULL,
    equipment_type TEXT NOT NULL,
    purchase_date  TEXT,
    purchase_cost  TEXT NOT NULL CHECK (CAST(purchase_cost AS REAL) >= 0),
    status         TEXT NOT NULL CHECK (status IN ('operational', 'under_maintenance', 'retired')),
    notes          TEXT
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_equipment_purchase ON equipment(purchase_date)",
    r#"
CREATE TABLE IF NOT EXISTS equipment_maintenance (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    equipment_id     INTEGER NOT NULL REFERENCES equipment(id),
    date             TEXT NOT NULL,
    maintenance_type TEXT NOT NULL,
    description      TEXT NOT NULL,
    cost             TEXT NOT NULL CHECK (CAST(cost AS REAL) >= 0),
    fuel_litres      TEXT NOT NULL CHECK (CAST(fuel_litres AS REAL) >= 0),
    hours_used       TEXT NOT NULL CHECK (CAST(hours_used AS REAL) >= 0),
    notes            TEXT
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_equipment_maintenance_equipment ON equipment_maintenance(equipment_id)",
    "CREATE INDEX IF NOT EXISTS idx_equipment_maintenance_date ON equipment_maintenance(date)",
    r#"
CREATE TABLE IF NOT EXISTS financial_transactions (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    date         TEXT NOT NULL,
    direction    TEXT NOT NULL CHECK (direction IN ('income', 'expense')),
    category     TEXT NOT NULL,
    subcategory  TEXT,
    amount       TEXT NOT NULL CHECK (CAST(amount AS REAL) >= 0),
    description  TEXT NOT NULL,
    reference_id TEXT,
    notes        TEXT
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_financial_transactions_date ON financial_transactions(date)",
    "CREATE INDEX IF NOT EXISTS idx_financial_transactions_category ON financial_transactions(category)",
];

/// Every table created by [`SCHEMA`], in creation order.
pub const TABLES: &[&str] = &[
    "animals",
    "milk_records",
    "breeding_records",
    "medicine_inventory",
    "health_records",
    "fodder_cultivation",
    "feed_inventory",
    "feed_consumption",
    "workers",
    "attendance",
    "equipment",
    "equipment_maintenance",
    "financial_transactions",
];

/// Creates all tables and indexes. Running it against an initialised store is a no-op.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::info!(tables = TABLES.len(), "Farm schema is ready.");
    Ok(())
}

/// Lists the user tables present in the store, sorted by name.
pub async fn schema_tables(pool: &SqlitePool) -> Result<Vec<String>, DbError> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(names)
}

/// Static description of a table, used to build filtered and keyed queries.
#[derive(Debug)]
pub(crate) struct TableSpec {
    /// Human-readable entity name for errors and logs.
    pub entity: &'static str,
    pub table: &'static str,
    pub columns: &'static str,
    /// Column used for range filters and, for time-series tables, ordering.
    pub date_column: Option<&'static str>,
    /// Foreign key matched by `RecordFilter::parent_id`.
    pub parent_column: Option<&'static str>,
    /// Time-series tables are returned newest first; others by id.
    pub time_series: bool,
}

pub(crate) static ANIMALS: TableSpec = TableSpec {
    entity: "animal",
    table: "animals",
    columns: "id, tag_id, name, ear_tag, birth_date, sex, breed, lifecycle_stage, status, sire, dam, registration_date, notes",
    date_column: Some("birth_date"),
    parent_column: None,
    time_series: false,
};

pub(crate) static MILK_RECORDS: TableSpec = TableSpec {
    entity: "milk record",
    table: "milk_records",
    columns: "id, animal_id, date, session, volume_litres, usage, price_per_litre, notes",
    date_column: Some("date"),
    parent_column: Some("animal_id"),
    time_series: true,
};

pub(crate) static BREEDING_RECORDS: TableSpec = TableSpec {
    entity: "breeding record",
    table: "breeding_records",
    columns: "id, animal_id, event_date, event_type, method, bull_id, outcome, calf_tag, calf_sex, notes",
    date_column: Some("event_date"),
    parent_column: Some("animal_id"),
    time_series: true,
};

pub(crate) static HEALTH_RECORDS: TableSpec = TableSpec {
    entity: "health record",
    table: "health_records",
    columns: "id, animal_id, date, record_type, diagnosis, treatment, medicine_id, dosage, cost, veterinarian, next_due, notes",
    date_column: Some("date"),
    parent_column: Some("animal_id"),
    time_series: true,
};

pub(crate) static MEDICINE_INVENTORY: TableSpec = TableSpec {
    entity: "medicine",
    table: "medicine_inventory",
    columns: "id, name, category, quantity, unit, expiry_date, cost_per_unit, supplier, reorder_level, notes",
    date_column: Some("expiry_date"),
    parent_column: None,
    time_series: false,
};

pub(crate) static FODDER_CULTIVATION: TableSpec = TableSpec {
    entity: "fodder cultivation",
    table: "fodder_cultivation",
    columns: "id, crop_type, plot_id, area_acres, sowing_date, harvest_date, yield_kg, cost, status, notes",
    date_column: Some("sowing_date"),
    parent_column: None,
    time_series: false,
};

pub(crate) static FEED_INVENTORY: TableSpec = TableSpec {
    entity: "feed inventory",
    table: "feed_inventory",
    columns: "id, feed_name, category, quantity_kg, unit_cost, purchase_date, expiry_date, supplier, notes",
    date_column: Some("purchase_date"),
    parent_column: None,
    time_series: false,
};

pub(crate) static FEED_CONSUMPTION: TableSpec = TableSpec {
    entity: "feed consumption",
    table: "feed_consumption",
    columns: "id, feed_id, date, quantity_kg, herd_size, notes",
    date_column: Some("date"),
    parent_column: Some("feed_id"),
    time_series: true,
};

pub(crate) static WORKERS: TableSpec = TableSpec {
    entity: "worker",
    table: "workers",
    columns: "id, name, role, phone, daily_wage, status",
    date_column: None,
    parent_column: None,
    time_series: false,
};

pub(crate) static ATTENDANCE: TableSpec = TableSpec {
    entity: "attendance",
    table: "attendance",
    columns: "id, worker_id, date, status, hours, tasks, notes",
    date_column: Some("date"),
    parent_column: Some("worker_id"),
    time_series: true,
};

pub(crate) static EQUIPMENT: TableSpec = TableSpec {
    entity: "equipment",
    table: "equipment",
    columns: "id, name, equipment_type, purchase_date, purchase_cost, status, notes",
    date_column: Some("purchase_date"),
    parent_column: None,
    time_series: false,
};

pub(crate) static EQUIPMENT_MAINTENANCE: TableSpec = TableSpec {
    entity: "equipment maintenance",
    table: "equipment_maintenance",
    columns: "id, equipment_id, date, maintenance_type, description, cost, fuel_litres, hours_used, notes",
    date_column: Some("date"),
    parent_column: Some("equipment_id"),
    time_series: true,
};

pub(crate) static FINANCIAL_TRANSACTIONS: TableSpec = TableSpec {
    entity: "financial transaction",
    table: "financial_transactions",
    columns: "id, date, direction, category, subcategory, amount, description, reference_id, notes",
    date_column: Some("date"),
    parent_column: None,
    time_series: true,
};
