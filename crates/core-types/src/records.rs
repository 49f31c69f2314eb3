//! Row types for every table in the farm store.
//!
//! Each entity comes as a pair: the stored row (`Animal`, `MilkRecord`, ...)
//! carrying its surrogate `id`, and the input struct (`NewAnimal`,
//! `NewMilkRecord`, ...) used by both create and update operations. Input
//! structs validate the data-level constraints before anything touches
//! storage; referential checks belong to the data access layer.

use crate::enums::{
    AnimalStatus, AttendanceStatus, BreedingEventType, BreedingMethod, BreedingOutcome,
    CropStatus, Direction, EquipmentStatus, HealthRecordType, LifecycleStage, MilkSession,
    MilkUsage, Sex, WorkerStatus,
};
use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn require_text(field: &'static str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(field, "is required"));
    }
    Ok(())
}

fn non_negative(field: &'static str, value: Decimal) -> Result<(), CoreError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(CoreError::validation(
            field,
            format!("must not be negative (got {value})"),
        ));
    }
    Ok(())
}

fn non_negative_opt(field: &'static str, value: Option<Decimal>) -> Result<(), CoreError> {
    match value {
        Some(v) => non_negative(field, v),
        None => Ok(()),
    }
}

fn not_before(
    field: &'static str,
    value: Option<NaiveDate>,
    earliest: NaiveDate,
) -> Result<(), CoreError> {
    match value {
        Some(date) if date < earliest => Err(CoreError::validation(
            field,
            format!("{date} is before {earliest}"),
        )),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Herd
// ---------------------------------------------------------------------------

/// One cow's (or bull's) profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: i64,
    /// The farm's own identifier, unique across the herd.
    pub tag_id: String,
    pub name: Option<String>,
    pub ear_tag: Option<String>,
    pub birth_date: NaiveDate,
    pub sex: Sex,
    pub breed: Option<String>,
    pub lifecycle_stage: LifecycleStage,
    pub status: AnimalStatus,
    pub sire: Option<String>,
    pub dam: Option<String>,
    pub registration_date: NaiveDate,
    pub notes: Option<String>,
}

impl Animal {
    pub fn is_active(&self) -> bool {
        self.status == AnimalStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAnimal {
    pub tag_id: String,
    pub name: Option<String>,
    pub ear_tag: Option<String>,
    pub birth_date: NaiveDate,
    pub sex: Sex,
    pub breed: Option<String>,
    pub lifecycle_stage: LifecycleStage,
    pub status: AnimalStatus,
    pub sire: Option<String>,
    pub dam: Option<String>,
    pub registration_date: NaiveDate,
    pub notes: Option<String>,
}

impl NewAnimal {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("tag_id", &self.tag_id)?;
        not_before("registration_date", Some(self.registration_date), self.birth_date)
    }
}

/// One milking session's yield for one animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilkRecord {
    pub id: i64,
    pub animal_id: i64,
    pub date: NaiveDate,
    pub session: MilkSession,
    pub volume_litres: Decimal,
    pub usage: MilkUsage,
    pub price_per_litre: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMilkRecord {
    pub animal_id: i64,
    pub date: NaiveDate,
    pub session: MilkSession,
    pub volume_litres: Decimal,
    pub usage: MilkUsage,
    pub price_per_litre: Option<Decimal>,
    pub notes: Option<String>,
}

impl NewMilkRecord {
    pub fn validate(&self) -> Result<(), CoreError> {
        non_negative("volume_litres", self.volume_litres)?;
        non_negative_opt("price_per_litre", self.price_per_litre)
    }
}

/// Heat, insemination, pregnancy check or calving event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingRecord {
    pub id: i64,
    pub animal_id: i64,
    pub event_date: NaiveDate,
    pub event_type: BreedingEventType,
    pub method: Option<BreedingMethod>,
    pub bull_id: Option<String>,
    pub outcome: Option<BreedingOutcome>,
    pub calf_tag: Option<String>,
    pub calf_sex: Option<Sex>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBreedingRecord {
    pub animal_id: i64,
    pub event_date: NaiveDate,
    pub event_type: BreedingEventType,
    pub method: Option<BreedingMethod>,
    pub bull_id: Option<String>,
    pub outcome: Option<BreedingOutcome>,
    pub calf_tag: Option<String>,
    pub calf_sex: Option<Sex>,
    pub notes: Option<String>,
}

impl NewBreedingRecord {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.event_type == BreedingEventType::Insemination && self.method.is_none() {
            return Err(CoreError::validation(
                "method",
                "is required for an insemination",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub id: i64,
    pub animal_id: i64,
    pub date: NaiveDate,
    pub record_type: HealthRecordType,
    pub diagnosis: String,
    pub treatment: Option<String>,
    /// Medicine drawn from inventory, if any.
    pub medicine_id: Option<i64>,
    pub dosage: Option<String>,
    pub cost: Decimal,
    pub veterinarian: Option<String>,
    pub next_due: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHealthRecord {
    pub animal_id: i64,
    pub date: NaiveDate,
    pub record_type: HealthRecordType,
    pub diagnosis: String,
    pub treatment: Option<String>,
    pub medicine_id: Option<i64>,
    pub dosage: Option<String>,
    pub cost: Decimal,
    pub veterinarian: Option<String>,
    pub next_due: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewHealthRecord {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("diagnosis", &self.diagnosis)?;
        non_negative("cost", self.cost)?;
        not_before("next_due", self.next_due, self.date)
    }
}

// ---------------------------------------------------------------------------
// Inventory and crops
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineItem {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub quantity: Decimal,
    pub unit: String,
    pub expiry_date: NaiveDate,
    pub cost_per_unit: Option<Decimal>,
    pub supplier: Option<String>,
    pub reorder_level: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMedicineItem {
    pub name: String,
    pub category: String,
    pub quantity: Decimal,
    pub unit: String,
    pub expiry_date: NaiveDate,
    pub cost_per_unit: Option<Decimal>,
    pub supplier: Option<String>,
    pub reorder_level: Decimal,
    pub notes: Option<String>,
}

impl NewMedicineItem {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("name", &self.name)?;
        require_text("category", &self.category)?;
        require_text("unit", &self.unit)?;
        non_negative("quantity", self.quantity)?;
        non_negative_opt("cost_per_unit", self.cost_per_unit)?;
        non_negative("reorder_level", self.reorder_level)
    }
}

/// One crop cycle on one plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FodderCultivation {
    pub id: i64,
    pub crop_type: String,
    pub plot_id: String,
    pub area_acres: Decimal,
    pub sowing_date: NaiveDate,
    pub harvest_date: Option<NaiveDate>,
    pub yield_kg: Decimal,
    pub cost: Decimal,
    pub status: CropStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFodderCultivation {
    pub crop_type: String,
    pub plot_id: String,
    pub area_acres: Decimal,
    pub sowing_date: NaiveDate,
    pub harvest_date: Option<NaiveDate>,
    pub yield_kg: Decimal,
    pub cost: Decimal,
    pub status: CropStatus,
    pub notes: Option<String>,
}

impl NewFodderCultivation {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("crop_type", &self.crop_type)?;
        require_text("plot_id", &self.plot_id)?;
        non_negative("area_acres", self.area_acres)?;
        non_negative("yield_kg", self.yield_kg)?;
        non_negative("cost", self.cost)?;
        not_before("harvest_date", self.harvest_date, self.sowing_date)
    }
}

/// A purchased lot of feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedInventory {
    pub id: i64,
    pub feed_name: String,
    pub category: String,
    pub quantity_kg: Decimal,
    pub unit_cost: Decimal,
    pub purchase_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub supplier: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFeedInventory {
    pub feed_name: String,
    pub category: String,
    pub quantity_kg: Decimal,
    pub unit_cost: Decimal,
    pub purchase_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub supplier: Option<String>,
    pub notes: Option<String>,
}

impl NewFeedInventory {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("feed_name", &self.feed_name)?;
        require_text("category", &self.category)?;
        non_negative("quantity_kg", self.quantity_kg)?;
        non_negative("unit_cost", self.unit_cost)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConsumption {
    pub id: i64,
    pub feed_id: i64,
    pub date: NaiveDate,
    pub quantity_kg: Decimal,
    pub herd_size: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFeedConsumption {
    pub feed_id: i64,
    pub date: NaiveDate,
    pub quantity_kg: Decimal,
    pub herd_size: u32,
    pub notes: Option<String>,
}

impl NewFeedConsumption {
    pub fn validate(&self) -> Result<(), CoreError> {
        non_negative("quantity_kg", self.quantity_kg)
    }
}

// ---------------------------------------------------------------------------
// Labour and equipment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub phone: Option<String>,
    pub daily_wage: Decimal,
    pub status: WorkerStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorker {
    pub name: String,
    pub role: String,
    pub phone: Option<String>,
    pub daily_wage: Decimal,
    pub status: WorkerStatus,
}

impl NewWorker {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("name", &self.name)?;
        require_text("role", &self.role)?;
        non_negative("daily_wage", self.daily_wage)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: i64,
    pub worker_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub hours: Option<Decimal>,
    pub tasks: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAttendance {
    pub worker_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub hours: Option<Decimal>,
    pub tasks: Option<String>,
    pub notes: Option<String>,
}

impl NewAttendance {
    pub fn validate(&self) -> Result<(), CoreError> {
        non_negative_opt("hours", self.hours)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: i64,
    pub name: String,
    pub equipment_type: String,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_cost: Decimal,
    pub status: EquipmentStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEquipment {
    pub name: String,
    pub equipment_type: String,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_cost: Decimal,
    pub status: EquipmentStatus,
    pub notes: Option<String>,
}

impl NewEquipment {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("name", &self.name)?;
        require_text("equipment_type", &self.equipment_type)?;
        non_negative("purchase_cost", self.purchase_cost)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentMaintenance {
    pub id: i64,
    pub equipment_id: i64,
    pub date: NaiveDate,
    pub maintenance_type: String,
    pub description: String,
    pub cost: Decimal,
    pub fuel_litres: Decimal,
    pub hours_used: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEquipmentMaintenance {
    pub equipment_id: i64,
    pub date: NaiveDate,
    pub maintenance_type: String,
    pub description: String,
    pub cost: Decimal,
    pub fuel_litres: Decimal,
    pub hours_used: Decimal,
    pub notes: Option<String>,
}

impl NewEquipmentMaintenance {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("maintenance_type", &self.maintenance_type)?;
        require_text("description", &self.description)?;
        non_negative("cost", self.cost)?;
        non_negative("fuel_litres", self.fuel_litres)?;
        non_negative("hours_used", self.hours_used)
    }
}

// ---------------------------------------------------------------------------
// Finance
// ---------------------------------------------------------------------------

/// A single ledger entry. `amount` is always non-negative; `direction` says
/// which side of the ledger it lands on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialTransaction {
    pub id: i64,
    pub date: NaiveDate,
    pub direction: Direction,
    pub category: String,
    pub subcategory: Option<String>,
    pub amount: Decimal,
    pub description: String,
    pub reference_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFinancialTransaction {
    pub date: NaiveDate,
    pub direction: Direction,
    pub category: String,
    pub subcategory: Option<String>,
    pub amount: Decimal,
    pub description: String,
    pub reference_id: Option<String>,
    pub notes: Option<String>,
}

impl NewFinancialTransaction {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("category", &self.category)?;
        require_text("description", &self.description)?;
        non_negative("amount", self.amount)
    }
}
