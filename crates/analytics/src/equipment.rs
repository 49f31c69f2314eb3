use crate::error::{period, AnalyticsError};
use crate::finance::month_key;
use chrono::NaiveDate;
use core_types::{Equipment, EquipmentMaintenance};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentCost {
    pub equipment_id: i64,
    pub name: String,
    pub services: usize,
    pub cost: Decimal,
    pub fuel_litres: Decimal,
    pub hours_used: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCost {
    pub month: String,
    pub cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_cost: Decimal,
    /// Costliest first. Only equipment with maintenance in the range appears.
    pub by_equipment: Vec<EquipmentCost>,
    pub by_month: Vec<MonthlyCost>,
}

pub fn equipment_cost(
    equipment: &[Equipment],
    maintenance: &[EquipmentMaintenance],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<EquipmentSummary, AnalyticsError> {
    let range = period(start, end)?;
    let names: HashMap<i64, &str> = equipment.iter().map(|e| (e.id, e.name.as_str())).collect();

    let mut per_item: HashMap<i64, EquipmentCost> = HashMap::new();
    let mut per_month: BTreeMap<String, Decimal> = BTreeMap::new();

    for entry in maintenance.iter().filter(|m| range.contains(m.date)) {
        let item = per_item
            .entry(entry.equipment_id)
            .or_insert_with(|| EquipmentCost {
                equipment_id: entry.equipment_id,
                name: names
                    .get(&entry.equipment_id)
                    .map_or_else(|| format!("equipment #{}", entry.equipment_id), |n| n.to_string()),
                services: 0,
                cost: Decimal::ZERO,
                fuel_litres: Decimal::ZERO,
                hours_used: Decimal::ZERO,
            });
        item.services += 1;
        item.cost += entry.cost;
        item.fuel_litres += entry.fuel_litres;
        item.hours_used += entry.hours_used;

        *per_month.entry(month_key(entry.date)).or_default() += entry.cost;
    }

    let mut by_equipment: Vec<EquipmentCost> = per_item.into_values().collect();
    by_equipment.sort_by(|a, b| b.cost.cmp(&a.cost).then(a.equipment_id.cmp(&b.equipment_id)));

    Ok(EquipmentSummary {
        start,
        end,
        total_cost: by_equipment.iter().map(|e| e.cost).sum(),
        by_equipment,
        by_month: per_month
            .into_iter()
            .map(|(month, cost)| MonthlyCost { month, cost })
            .collect(),
    })
}
