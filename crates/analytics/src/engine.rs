use crate::alerts::{self, ExpiryAlert};
use crate::breeding::{self, BreedingStatus, PregnancyState};
use crate::error::AnalyticsError;
use crate::finance;
use crate::health::{self, FollowUp};
use crate::milk;
use crate::report::{Dashboard, FarmSnapshot, StageCount};
use chrono::NaiveDate;
use configuration::MetricsSettings;
use core_types::{
    Animal, BreedingRecord, DateRange, EquipmentStatus, FeedInventory, HealthRecord,
    LifecycleStage, MedicineItem, WorkerStatus,
};

/// Number of days shown in the dashboard's daily milk trend.
const RECENT_MILK_DAYS: usize = 14;

/// A stateless calculator for the metrics that depend on configured constants.
///
/// The free functions in each module remain available for callers that want
/// to pass the constants explicitly.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    settings: MetricsSettings,
}

impl AnalyticsEngine {
    pub fn new(settings: &MetricsSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    pub fn settings(&self) -> &MetricsSettings {
        &self.settings
    }

    pub fn breeding_status(
        &self,
        animals: &[Animal],
        records: &[BreedingRecord],
        today: NaiveDate,
    ) -> Vec<BreedingStatus> {
        breeding::breeding_status(
            animals,
            records,
            today,
            self.settings.gestation_days,
            self.settings.lactation_days,
        )
    }

    pub fn expiry_alerts(
        &self,
        medicines: &[MedicineItem],
        feeds: &[FeedInventory],
        today: NaiveDate,
    ) -> Vec<ExpiryAlert> {
        alerts::expiry_alerts(medicines, feeds, today, self.settings.expiry_threshold_days)
    }

    pub fn follow_ups(&self, records: &[HealthRecord], today: NaiveDate) -> Vec<FollowUp> {
        health::upcoming_follow_ups(records, today, self.settings.follow_up_days)
    }

    /// Builds the dashboard from a snapshot of the whole farm.
    pub fn dashboard(
        &self,
        farm: &FarmSnapshot<'_>,
        today: NaiveDate,
    ) -> Result<Dashboard, AnalyticsError> {
        let window = DateRange::last_days(today, self.settings.dashboard_window_days);

        let active: Vec<&Animal> = farm.animals.iter().filter(|a| a.is_active()).collect();
        let herd_by_stage = LifecycleStage::ALL
            .iter()
            .map(|&stage| StageCount {
                stage,
                count: active.iter().filter(|a| a.lifecycle_stage == stage).count(),
            })
            .collect();

        let statuses = self.breeding_status(farm.animals, farm.breeding, today);
        let count_state =
            |state: PregnancyState| statuses.iter().filter(|s| s.state == state).count();

        let milk_window = milk::milk_summary(farm.milk, window.start(), window.end())?;
        let recent_daily_milk = {
            let days = &milk_window.by_day;
            days[days.len().saturating_sub(RECENT_MILK_DAYS)..].to_vec()
        };
        let money = finance::financial_summary(farm.transactions, window.start(), window.end())?;

        let dashboard = Dashboard {
            as_of: today,
            total_animals: farm.animals.len(),
            active_animals: active.len(),
            herd_by_stage,
            pregnant: count_state(PregnancyState::Pregnant),
            overdue_calvings: count_state(PregnancyState::Overdue),
            milk_today_litres: milk::litres_on(farm.milk, today),
            window_days: self.settings.dashboard_window_days,
            window_milk_litres: milk_window.total_litres,
            window_average_per_animal_day: milk_window.average_per_animal_day,
            recent_daily_milk,
            window_income: money.total_income,
            window_expense: money.total_expense,
            window_net: money.net,
            expiry_alerts: self.expiry_alerts(farm.medicines, farm.feeds, today).len(),
            low_stock_alerts: alerts::low_stock_alerts(farm.medicines).len(),
            follow_ups_due: self.follow_ups(farm.health, today).len(),
            active_workers: farm
                .workers
                .iter()
                .filter(|w| w.status == WorkerStatus::Active)
                .count(),
            equipment_total: farm.equipment.len(),
            operational_equipment: farm
                .equipment
                .iter()
                .filter(|e| e.status == EquipmentStatus::Operational)
                .count(),
        };

        tracing::debug!(
            as_of = %today,
            alerts = dashboard.alert_count(),
            "Dashboard computed."
        );
        Ok(dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use core_types::{
        AnimalStatus, BreedingEventType, BreedingMethod, Direction, FinancialTransaction,
        MilkRecord, MilkSession, MilkUsage, Sex,
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    fn animal(id: i64, stage: LifecycleStage, status: AnimalStatus) -> Animal {
        Animal {
            id,
            tag_id: format!("T-{id}"),
            name: None,
            ear_tag: None,
            birth_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            sex: Sex::Female,
            breed: None,
            lifecycle_stage: stage,
            status,
            sire: None,
            dam: None,
            registration_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn empty_farm_gives_a_zero_dashboard() {
        let engine = AnalyticsEngine::default();
        let dashboard = engine.dashboard(&FarmSnapshot::default(), today()).unwrap();
        assert_eq!(dashboard.total_animals, 0);
        assert_eq!(dashboard.window_net, Decimal::ZERO);
        assert_eq!(dashboard.herd_by_stage.len(), LifecycleStage::ALL.len());
        assert_eq!(dashboard.alert_count(), 0);
    }

    #[test]
    fn dashboard_counts_the_herd_milk_and_money() {
        let animals = [
            animal(1, LifecycleStage::AdultCow, AnimalStatus::Active),
            animal(2, LifecycleStage::Heifer, AnimalStatus::Active),
            animal(3, LifecycleStage::AdultCow, AnimalStatus::Sold),
        ];
        let milk = [
            MilkRecord {
                id: 1,
                animal_id: 1,
                date: today(),
                session: MilkSession::Morning,
                volume_litres: dec!(11),
                usage: MilkUsage::Sale,
                price_per_litre: None,
                notes: None,
            },
            MilkRecord {
                id: 2,
                animal_id: 1,
                date: today() - Duration::days(40),
                session: MilkSession::Morning,
                volume_litres: dec!(99),
                usage: MilkUsage::Sale,
                price_per_litre: None,
                notes: None,
            },
        ];
        let breeding = [BreedingRecord {
            id: 1,
            animal_id: 1,
            event_date: today() - Duration::days(300),
            event_type: BreedingEventType::Insemination,
            method: Some(BreedingMethod::Natural),
            bull_id: None,
            outcome: None,
            calf_tag: None,
            calf_sex: None,
            notes: None,
        }];
        let transactions = [FinancialTransaction {
            id: 1,
            date: today() - Duration::days(3),
            direction: Direction::Income,
            category: "Milk Sales".into(),
            subcategory: None,
            amount: dec!(2500),
            description: "Weekly payout".into(),
            reference_id: None,
            notes: None,
        }];
        let farm = FarmSnapshot {
            animals: &animals,
            milk: &milk,
            breeding: &breeding,
            transactions: &transactions,
            ..FarmSnapshot::default()
        };

        let dashboard = AnalyticsEngine::default().dashboard(&farm, today()).unwrap();
        assert_eq!(dashboard.total_animals, 3);
        assert_eq!(dashboard.active_animals, 2);
        let adults = dashboard
            .herd_by_stage
            .iter()
            .find(|s| s.stage == LifecycleStage::AdultCow)
            .map(|s| s.count);
        assert_eq!(adults, Some(1));
        assert_eq!(dashboard.milk_today_litres, dec!(11));
        assert_eq!(dashboard.window_milk_litres, dec!(11));
        assert_eq!(dashboard.window_net, dec!(2500));
        assert_eq!(dashboard.overdue_calvings, 1);
        assert_eq!(dashboard.alert_count(), 1);
    }
}
