//! Milk production totals and sales revenue.

use crate::error::{period, AnalyticsError};
use chrono::NaiveDate;
use core_types::{MilkRecord, MilkUsage};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalMilkTotal {
    pub animal_id: i64,
    pub total_litres: Decimal,
    /// Distinct days on which the animal was milked.
    pub milking_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMilkTotal {
    pub date: NaiveDate,
    pub total_litres: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilkSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_litres: Decimal,
    pub record_count: usize,
    /// Distinct (animal, date) pairs in the range.
    pub animal_days: usize,
    /// `total_litres / animal_days`, zero when there are no records.
    pub average_per_animal_day: Decimal,
    pub sales_revenue: Decimal,
    /// Highest producers first.
    pub by_animal: Vec<AnimalMilkTotal>,
    /// Oldest day first.
    pub by_day: Vec<DailyMilkTotal>,
}

/// Aggregates the records dated between `start` and `end` inclusive.
///
/// Morning and evening sessions of the same animal on the same day count as a
/// single animal-day, so the average is a per-cow daily yield rather than a
/// per-session one.
pub fn milk_summary(
    records: &[MilkRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<MilkSummary, AnalyticsError> {
    let range = period(start, end)?;
    let in_range: Vec<&MilkRecord> = records.iter().filter(|r| range.contains(r.date)).collect();

    let mut total_litres = Decimal::ZERO;
    let mut animal_days: BTreeSet<(i64, NaiveDate)> = BTreeSet::new();
    let mut per_animal: HashMap<i64, (Decimal, BTreeSet<NaiveDate>)> = HashMap::new();
    let mut per_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

    for record in &in_range {
        total_litres += record.volume_litres;
        animal_days.insert((record.animal_id, record.date));

        let entry = per_animal.entry(record.animal_id).or_default();
        entry.0 += record.volume_litres;
        entry.1.insert(record.date);

        *per_day.entry(record.date).or_default() += record.volume_litres;
    }

    let average_per_animal_day = if animal_days.is_empty() {
        Decimal::ZERO
    } else {
        total_litres / Decimal::from(animal_days.len())
    };

    let mut by_animal: Vec<AnimalMilkTotal> = per_animal
        .into_iter()
        .map(|(animal_id, (total_litres, days))| AnimalMilkTotal {
            animal_id,
            total_litres,
            milking_days: days.len(),
        })
        .collect();
    by_animal.sort_by(|a, b| {
        b.total_litres
            .cmp(&a.total_litres)
            .then(a.animal_id.cmp(&b.animal_id))
    });

    let by_day = per_day
        .into_iter()
        .map(|(date, total_litres)| DailyMilkTotal { date, total_litres })
        .collect();

    Ok(MilkSummary {
        start,
        end,
        total_litres,
        record_count: in_range.len(),
        animal_days: animal_days.len(),
        average_per_animal_day,
        sales_revenue: milk_revenue(in_range.iter().copied()),
        by_animal,
        by_day,
    })
}

/// Revenue from milk sold at a recorded price. Home use, calf feeding and
/// unpriced sales contribute nothing.
pub fn milk_revenue<'a>(records: impl IntoIterator<Item = &'a MilkRecord>) -> Decimal {
    records
        .into_iter()
        .filter(|r| r.usage == MilkUsage::Sale)
        .filter_map(|r| r.price_per_litre.map(|price| price * r.volume_litres))
        .sum()
}

/// Total litres recorded on one day.
pub fn litres_on(records: &[MilkRecord], day: NaiveDate) -> Decimal {
    records
        .iter()
        .filter(|r| r.date == day)
        .map(|r| r.volume_litres)
        .sum()
}
