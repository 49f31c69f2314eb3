use crate::milk::DailyMilkTotal;
use chrono::NaiveDate;
use core_types::{
    Animal, BreedingRecord, Equipment, FeedInventory, FinancialTransaction, HealthRecord,
    LifecycleStage, MedicineItem, MilkRecord, Worker,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything the dashboard reads, borrowed from whatever loaded it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FarmSnapshot<'a> {
    pub animals: &'a [Animal],
    pub milk: &'a [MilkRecord],
    pub breeding: &'a [BreedingRecord],
    pub health: &'a [HealthRecord],
    pub medicines: &'a [MedicineItem],
    pub feeds: &'a [FeedInventory],
    pub workers: &'a [Worker],
    pub equipment: &'a [Equipment],
    pub transactions: &'a [FinancialTransaction],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageCount {
    pub stage: LifecycleStage,
    pub count: usize,
}

/// The farm at a glance.
///
/// This struct is the final output of `AnalyticsEngine::dashboard`. All
/// "window" figures cover the trailing `window_days` ending on `as_of`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub as_of: NaiveDate,

    // I. Herd
    pub total_animals: usize,
    pub active_animals: usize,
    /// Active animals per stage; every stage is listed, including empty ones.
    pub herd_by_stage: Vec<StageCount>,
    pub pregnant: usize,
    pub overdue_calvings: usize,

    // II. Milk
    pub milk_today_litres: Decimal,
    pub window_days: u32,
    pub window_milk_litres: Decimal,
    pub window_average_per_animal_day: Decimal,
    pub recent_daily_milk: Vec<DailyMilkTotal>,

    // III. Money
    pub window_income: Decimal,
    pub window_expense: Decimal,
    pub window_net: Decimal,

    // IV. Attention needed
    pub expiry_alerts: usize,
    pub low_stock_alerts: usize,
    pub follow_ups_due: usize,

    // V. Resources
    pub active_workers: usize,
    pub equipment_total: usize,
    pub operational_equipment: usize,
}

impl Dashboard {
    /// Total number of items that need someone's attention.
    pub fn alert_count(&self) -> usize {
        self.expiry_alerts + self.low_stock_alerts + self.follow_ups_due + self.overdue_calvings
    }
}
