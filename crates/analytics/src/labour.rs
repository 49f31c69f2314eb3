use crate::error::{period, AnalyticsError};
use chrono::NaiveDate;
use core_types::{Attendance, AttendanceStatus, Worker};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerCost {
    pub worker_id: i64,
    pub name: String,
    pub role: String,
    /// Paid days; a half day counts as 0.5.
    pub days_worked: Decimal,
    pub daily_wage: Decimal,
    pub cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabourSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_days: Decimal,
    pub total_cost: Decimal,
    /// Most expensive first.
    pub by_worker: Vec<WorkerCost>,
}

/// Fraction of a daily wage earned for one attendance entry.
pub fn paid_fraction(status: AttendanceStatus) -> Decimal {
    match status {
        AttendanceStatus::Present => Decimal::ONE,
        AttendanceStatus::HalfDay => Decimal::new(5, 1),
        AttendanceStatus::Absent | AttendanceStatus::Leave => Decimal::ZERO,
    }
}

/// Wage cost of the attendance recorded between `start` and `end`.
///
/// Every worker in `workers` gets a row, including those with nothing
/// recorded in the range. Attendance for workers not in the list is ignored.
pub fn labour_cost(
    workers: &[Worker],
    attendance: &[Attendance],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<LabourSummary, AnalyticsError> {
    let range = period(start, end)?;

    let mut days: HashMap<i64, Decimal> = HashMap::new();
    for entry in attendance.iter().filter(|a| range.contains(a.date)) {
        *days.entry(entry.worker_id).or_default() += paid_fraction(entry.status);
    }

    let mut by_worker: Vec<WorkerCost> = workers
        .iter()
        .map(|worker| {
            let days_worked = days.get(&worker.id).copied().unwrap_or_default();
            WorkerCost {
                worker_id: worker.id,
                name: worker.name.clone(),
                role: worker.role.clone(),
                days_worked,
                daily_wage: worker.daily_wage,
                cost: days_worked * worker.daily_wage,
            }
        })
        .collect();
    by_worker.sort_by(|a, b| b.cost.cmp(&a.cost).then(a.worker_id.cmp(&b.worker_id)));

    Ok(LabourSummary {
        start,
        end,
        total_days: by_worker.iter().map(|w| w.days_worked).sum(),
        total_cost: by_worker.iter().map(|w| w.cost).sum(),
        by_worker,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::WorkerStatus;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn worker(id: i64, wage: Decimal) -> Worker {
        Worker {
            id,
            name: format!("worker-{id}"),
            role: "Milker".into(),
            phone: None,
            daily_wage: wage,
            status: WorkerStatus::Active,
        }
    }

    fn day(worker_id: i64, d: u32, status: AttendanceStatus) -> Attendance {
        Attendance {
            id: 0,
            worker_id,
            date: date(d),
            status,
            hours: None,
            tasks: None,
            notes: None,
        }
    }

    #[test]
    fn half_days_are_paid_half() {
        let workers = [worker(1, dec!(600)), worker(2, dec!(500))];
        let attendance = [
            day(1, 1, AttendanceStatus::Present),
            day(1, 2, AttendanceStatus::HalfDay),
            day(1, 3, AttendanceStatus::Leave),
            day(2, 1, AttendanceStatus::Absent),
        ];
        let summary = labour_cost(&workers, &attendance, date(1), date(31)).unwrap();

        assert_eq!(summary.by_worker[0].worker_id, 1);
        assert_eq!(summary.by_worker[0].days_worked, dec!(1.5));
        assert_eq!(summary.by_worker[0].cost, dec!(900));
        assert_eq!(summary.by_worker[1].cost, Decimal::ZERO);
        assert_eq!(summary.total_cost, dec!(900));
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert!(labour_cost(&[], &[], date(9), date(2)).is_err());
    }
}
