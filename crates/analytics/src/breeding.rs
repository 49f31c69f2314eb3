//! Pregnancy tracking and lactation stages.

use chrono::{Duration, NaiveDate};
use core_types::{Animal, BreedingEventType, BreedingOutcome, BreedingRecord, Sex};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PregnancyState {
    /// No insemination since the last calving, or the last one failed.
    Open,
    /// Inseminated and expected calving is today or later.
    Pregnant,
    /// Expected calving has passed without a calving being recorded.
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LactationStage {
    Early,
    Mid,
    Late,
    Dry,
    /// The animal has no recorded calving.
    Unknown,
}

/// One row per cow. Flat so it can be exported as CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingStatus {
    pub animal_id: i64,
    pub tag_id: String,
    pub last_insemination: Option<NaiveDate>,
    pub last_calving: Option<NaiveDate>,
    pub state: PregnancyState,
    pub expected_calving: Option<NaiveDate>,
    pub days_overdue: Option<i64>,
    pub days_in_milk: Option<i64>,
    pub lactation_stage: LactationStage,
}

/// Stage of lactation from the days elapsed since the last calving.
pub fn lactation_stage(
    last_calving: Option<NaiveDate>,
    today: NaiveDate,
    lactation_days: u32,
) -> LactationStage {
    let Some(calved) = last_calving else {
        return LactationStage::Unknown;
    };
    match (today - calved).num_days() {
        d if d <= 100 => LactationStage::Early,
        d if d <= 200 => LactationStage::Mid,
        d if d <= i64::from(lactation_days) => LactationStage::Late,
        _ => LactationStage::Dry,
    }
}

/// Pregnancy and lactation status of every active female in `animals`.
///
/// `records` may contain events for any animal; only each cow's own events
/// are considered. A pregnancy check or the insemination itself carrying a
/// `Failed` outcome returns the cow to `Open`.
pub fn breeding_status(
    animals: &[Animal],
    records: &[BreedingRecord],
    today: NaiveDate,
    gestation_days: u32,
    lactation_days: u32,
) -> Vec<BreedingStatus> {
    animals
        .iter()
        .filter(|a| a.is_active() && a.sex == Sex::Female)
        .map(|animal| {
            let own: Vec<&BreedingRecord> =
                records.iter().filter(|r| r.animal_id == animal.id).collect();
            status_for(animal, &own, today, gestation_days, lactation_days)
        })
        .collect()
}

fn status_for(
    animal: &Animal,
    records: &[&BreedingRecord],
    today: NaiveDate,
    gestation_days: u32,
    lactation_days: u32,
) -> BreedingStatus {
    let latest = |kind: BreedingEventType| {
        records
            .iter()
            .filter(|r| r.event_type == kind)
            .max_by_key(|r| (r.event_date, r.id))
            .copied()
    };
    let insemination = latest(BreedingEventType::Insemination);
    let last_calving = latest(BreedingEventType::Calving).map(|r| r.event_date);

    let mut state = PregnancyState::Open;
    let mut expected_calving = None;
    let mut days_overdue = None;

    if let Some(service) = insemination {
        let served = service.event_date;
        let calved_since = last_calving.is_some_and(|c| c >= served);
        let failed = service.outcome == Some(BreedingOutcome::Failed)
            || records.iter().any(|r| {
                r.event_type == BreedingEventType::PregnancyCheck
                    && r.event_date >= served
                    && r.outcome == Some(BreedingOutcome::Failed)
            });

        if !calved_since && !failed {
            let expected = served + Duration::days(i64::from(gestation_days));
            expected_calving = Some(expected);
            if expected >= today {
                state = PregnancyState::Pregnant;
            } else {
                state = PregnancyState::Overdue;
                days_overdue = Some((today - expected).num_days());
            }
        }
    }

    BreedingStatus {
        animal_id: animal.id,
        tag_id: animal.tag_id.clone(),
        last_insemination: insemination.map(|r| r.event_date),
        last_calving,
        state,
        expected_calving,
        days_overdue,
        days_in_milk: last_calving.map(|c| (today - c).num_days()),
        lactation_stage: lactation_stage(last_calving, today, lactation_days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{AnimalStatus, BreedingMethod, LifecycleStage};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    fn cow(id: i64) -> Animal {
        Animal {
            id,
            tag_id: format!("A-{id}"),
            name: None,
            ear_tag: None,
            birth_date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            sex: Sex::Female,
            breed: None,
            lifecycle_stage: LifecycleStage::AdultCow,
            status: AnimalStatus::Active,
            sire: None,
            dam: None,
            registration_date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            notes: None,
        }
    }

    fn event(id: i64, animal_id: i64, days_ago: i64, kind: BreedingEventType) -> BreedingRecord {
        BreedingRecord {
            id,
            animal_id,
            event_date: today() - Duration::days(days_ago),
            event_type: kind,
            method: (kind == BreedingEventType::Insemination).then_some(BreedingMethod::Artificial),
            bull_id: None,
            outcome: None,
            calf_tag: None,
            calf_sex: None,
            notes: None,
        }
    }

    #[test]
    fn insemination_past_gestation_is_overdue() {
        let records = vec![event(1, 1, 290, BreedingEventType::Insemination)];
        let status = breeding_status(&[cow(1)], &records, today(), 283, 305);

        assert_eq!(status[0].state, PregnancyState::Overdue);
        assert_eq!(status[0].days_overdue, Some(7));
        assert_eq!(
            status[0].expected_calving,
            Some(today() - Duration::days(7))
        );
    }

    #[test]
    fn overdue_is_measured_from_the_latest_insemination() {
        let records = vec![
            event(2, 1, 290, BreedingEventType::Insemination),
            event(1, 1, 400, BreedingEventType::Insemination),
        ];
        let status = breeding_status(&[cow(1)], &records, today(), 283, 305);

        assert_eq!(status[0].state, PregnancyState::Overdue);
        assert_eq!(
            status[0].last_insemination,
            Some(today() - Duration::days(290))
        );
        assert_eq!(
            status[0].expected_calving,
            Some(today() - Duration::days(7))
        );
        assert_eq!(status[0].days_overdue, Some(7));
    }

    #[test]
    fn calving_due_today_is_still_pregnant() {
        let records = vec![event(1, 1, 283, BreedingEventType::Insemination)];
        let status = breeding_status(&[cow(1)], &records, today(), 283, 305);
        assert_eq!(status[0].state, PregnancyState::Pregnant);
        assert_eq!(status[0].expected_calving, Some(today()));
        assert_eq!(status[0].days_overdue, None);
    }

    #[test]
    fn calving_after_insemination_reopens_the_cow() {
        let records = vec![
            event(1, 1, 400, BreedingEventType::Insemination),
            event(2, 1, 120, BreedingEventType::Calving),
        ];
        let status = breeding_status(&[cow(1)], &records, today(), 283, 305);
        assert_eq!(status[0].state, PregnancyState::Open);
        assert_eq!(status[0].days_in_milk, Some(120));
        assert_eq!(status[0].lactation_stage, LactationStage::Mid);
    }

    #[test]
    fn failed_pregnancy_check_reopens_the_cow() {
        let mut check = event(2, 1, 20, BreedingEventType::PregnancyCheck);
        check.outcome = Some(BreedingOutcome::Failed);
        let records = vec![event(1, 1, 60, BreedingEventType::Insemination), check];
        let status = breeding_status(&[cow(1)], &records, today(), 283, 305);
        assert_eq!(status[0].state, PregnancyState::Open);
        assert_eq!(status[0].expected_calving, None);
    }

    #[test]
    fn bulls_and_sold_animals_are_skipped() {
        let mut bull = cow(1);
        bull.sex = Sex::Male;
        let mut sold = cow(2);
        sold.status = AnimalStatus::Sold;
        assert!(breeding_status(&[bull, sold], &[], today(), 283, 305).is_empty());
    }

    #[test]
    fn lactation_stage_boundaries() {
        let stage = |days| lactation_stage(Some(today() - Duration::days(days)), today(), 305);
        assert_eq!(stage(0), LactationStage::Early);
        assert_eq!(stage(100), LactationStage::Early);
        assert_eq!(stage(101), LactationStage::Mid);
        assert_eq!(stage(200), LactationStage::Mid);
        assert_eq!(stage(305), LactationStage::Late);
        assert_eq!(stage(306), LactationStage::Dry);
        assert_eq!(lactation_stage(None, today(), 305), LactationStage::Unknown);
    }
}
