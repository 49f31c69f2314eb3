use crate::error::{period, AnalyticsError};
use chrono::{Datelike, NaiveDate};
use core_types::{HealthRecord, HealthRecordType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthTypeTotal {
    pub record_type: HealthRecordType,
    pub records: usize,
    pub cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyHealthCount {
    pub year: i32,
    pub records: usize,
    pub cost: Decimal,
}

/// A treatment or vaccination whose next dose is coming up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub record_id: i64,
    pub animal_id: i64,
    pub record_type: HealthRecordType,
    pub diagnosis: String,
    pub next_due: NaiveDate,
    pub days_until_due: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_records: usize,
    pub total_cost: Decimal,
    pub by_type: Vec<HealthTypeTotal>,
    pub by_year: Vec<YearlyHealthCount>,
}

/// Counts and costs of the health records dated between `start` and `end`.
pub fn health_summary(
    records: &[HealthRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<HealthSummary, AnalyticsError> {
    let range = period(start, end)?;

    let mut total_records = 0;
    let mut total_cost = Decimal::ZERO;
    let mut types: BTreeMap<HealthRecordType, (usize, Decimal)> = BTreeMap::new();
    let mut years: BTreeMap<i32, (usize, Decimal)> = BTreeMap::new();

    for record in records.iter().filter(|r| range.contains(r.date)) {
        total_records += 1;
        total_cost += record.cost;
        for slot in [
            types.entry(record.record_type).or_default(),
            years.entry(record.date.year()).or_default(),
        ] {
            slot.0 += 1;
            slot.1 += record.cost;
        }
    }

    Ok(HealthSummary {
        start,
        end,
        total_records,
        total_cost,
        by_type: types
            .into_iter()
            .map(|(record_type, (records, cost))| HealthTypeTotal {
                record_type,
                records,
                cost,
            })
            .collect(),
        by_year: years
            .into_iter()
            .map(|(year, (records, cost))| YearlyHealthCount {
                year,
                records,
                cost,
            })
            .collect(),
    })
}

/// Records whose `next_due` falls between today and `within_days` from now,
/// soonest first. Missed follow-ups (due before today) are included with a
/// negative `days_until_due`.
pub fn upcoming_follow_ups(
    records: &[HealthRecord],
    today: NaiveDate,
    within_days: u32,
) -> Vec<FollowUp> {
    let mut due: Vec<FollowUp> = records
        .iter()
        .filter_map(|r| {
            let next_due = r.next_due?;
            let days_until_due = (next_due - today).num_days();
            (days_until_due <= i64::from(within_days)).then(|| FollowUp {
                record_id: r.id,
                animal_id: r.animal_id,
                record_type: r.record_type,
                diagnosis: r.diagnosis.clone(),
                next_due,
                days_until_due,
            })
        })
        .collect();
    due.sort_by_key(|f| (f.next_due, f.record_id));
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn record(id: i64, kind: HealthRecordType, days_ago: i64, cost: Decimal) -> HealthRecord {
        HealthRecord {
            id,
            animal_id: 1,
            date: today() - Duration::days(days_ago),
            record_type: kind,
            diagnosis: "Routine".into(),
            treatment: None,
            medicine_id: None,
            dosage: None,
            cost,
            veterinarian: None,
            next_due: None,
            notes: None,
        }
    }

    #[test]
    fn totals_per_type_and_year() {
        let records = [
            record(1, HealthRecordType::Vaccination, 10, dec!(150)),
            record(2, HealthRecordType::Vaccination, 200, dec!(150)),
            record(3, HealthRecordType::Treatment, 3, dec!(900)),
        ];
        let summary = health_summary(&records, today() - Duration::days(365), today()).unwrap();
        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.total_cost, dec!(1200));
        assert_eq!(summary.by_type[0].record_type, HealthRecordType::Vaccination);
        assert_eq!(summary.by_type[0].records, 2);
        assert_eq!(summary.by_year.len(), 2);
    }

    #[test]
    fn follow_ups_within_the_window() {
        let mut soon = record(1, HealthRecordType::Treatment, 2, dec!(0));
        soon.next_due = Some(today() + Duration::days(5));
        let mut later = record(2, HealthRecordType::Deworming, 2, dec!(0));
        later.next_due = Some(today() + Duration::days(40));
        let mut missed = record(3, HealthRecordType::Vaccination, 30, dec!(0));
        missed.next_due = Some(today() - Duration::days(1));

        let due = upcoming_follow_ups(&[soon, later, missed], today(), 7);
        let ids: Vec<i64> = due.iter().map(|f| f.record_id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(due[0].days_until_due, -1);
    }
}
