//! Feed consumption, feed cost and milk-per-kg efficiency.

use crate::error::{period, AnalyticsError};
use chrono::NaiveDate;
use core_types::{FeedConsumption, FeedInventory, MilkRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedTotal {
    pub feed_id: i64,
    pub feed_name: String,
    pub quantity_kg: Decimal,
    pub cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFeedTotal {
    pub date: NaiveDate,
    pub quantity_kg: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_kg: Decimal,
    pub total_cost: Decimal,
    pub milk_litres: Decimal,
    /// Litres of milk per kilogram of feed; `None` when no feed was recorded.
    pub efficiency: Option<Decimal>,
    /// Largest quantity first.
    pub by_feed: Vec<FeedTotal>,
    pub by_day: Vec<DailyFeedTotal>,
}

/// Rolls up feed use between `start` and `end` and compares it with the milk
/// produced over the same days.
///
/// Each consumption row is costed at the unit cost of the inventory lot it
/// draws from. Rows whose lot is not in `inventory` are still counted in
/// quantity but cost nothing.
pub fn feed_summary(
    consumption: &[FeedConsumption],
    inventory: &[FeedInventory],
    milk: &[MilkRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<FeedSummary, AnalyticsError> {
    let range = period(start, end)?;
    let lots: HashMap<i64, &FeedInventory> = inventory.iter().map(|f| (f.id, f)).collect();

    let mut per_feed: HashMap<i64, (Decimal, Decimal)> = HashMap::new();
    let mut per_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

    for row in consumption.iter().filter(|c| range.contains(c.date)) {
        let unit_cost = lots
            .get(&row.feed_id)
            .map_or(Decimal::ZERO, |lot| lot.unit_cost);
        let slot = per_feed.entry(row.feed_id).or_default();
        slot.0 += row.quantity_kg;
        slot.1 += row.quantity_kg * unit_cost;
        *per_day.entry(row.date).or_default() += row.quantity_kg;
    }

    let mut by_feed: Vec<FeedTotal> = per_feed
        .into_iter()
        .map(|(feed_id, (quantity_kg, cost))| FeedTotal {
            feed_id,
            feed_name: lots
                .get(&feed_id)
                .map_or_else(|| format!("feed #{feed_id}"), |lot| lot.feed_name.clone()),
            quantity_kg,
            cost,
        })
        .collect();
    by_feed.sort_by(|a, b| b.quantity_kg.cmp(&a.quantity_kg).then(a.feed_id.cmp(&b.feed_id)));

    let total_kg: Decimal = by_feed.iter().map(|f| f.quantity_kg).sum();
    let total_cost: Decimal = by_feed.iter().map(|f| f.cost).sum();
    let milk_litres: Decimal = milk
        .iter()
        .filter(|m| range.contains(m.date))
        .map(|m| m.volume_litres)
        .sum();
    let efficiency = (!total_kg.is_zero()).then(|| milk_litres / total_kg);

    Ok(FeedSummary {
        start,
        end,
        total_kg,
        total_cost,
        milk_litres,
        efficiency,
        by_feed,
        by_day: per_day
            .into_iter()
            .map(|(date, quantity_kg)| DailyFeedTotal { date, quantity_kg })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{MilkSession, MilkUsage};
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn lot(id: i64, name: &str, unit_cost: Decimal) -> FeedInventory {
        FeedInventory {
            id,
            feed_name: name.into(),
            category: "Concentrate".into(),
            quantity_kg: dec!(1000),
            unit_cost,
            purchase_date: date(1),
            expiry_date: None,
            supplier: None,
            notes: None,
        }
    }

    fn used(feed_id: i64, d: u32, kg: Decimal) -> FeedConsumption {
        FeedConsumption {
            id: 0,
            feed_id,
            date: date(d),
            quantity_kg: kg,
            herd_size: 10,
            notes: None,
        }
    }

    fn milked(d: u32, litres: Decimal) -> MilkRecord {
        MilkRecord {
            id: 0,
            animal_id: 1,
            date: date(d),
            session: MilkSession::Morning,
            volume_litres: litres,
            usage: MilkUsage::Sale,
            price_per_litre: None,
            notes: None,
        }
    }

    #[test]
    fn costs_follow_the_lot_and_efficiency_is_litres_per_kg() {
        let inventory = [lot(1, "Pellets", dec!(30)), lot(2, "Silage", dec!(5))];
        let consumption = [used(1, 1, dec!(20)), used(2, 1, dec!(80)), used(2, 2, dec!(100))];
        let milk = [milked(1, dec!(90)), milked(2, dec!(110))];

        let summary = feed_summary(&consumption, &inventory, &milk, date(1), date(2)).unwrap();
        assert_eq!(summary.total_kg, dec!(200));
        assert_eq!(summary.total_cost, dec!(1500));
        assert_eq!(summary.efficiency, Some(dec!(1)));
        assert_eq!(summary.by_feed[0].feed_name, "Silage");
        assert_eq!(summary.by_day[1].quantity_kg, dec!(100));
    }

    #[test]
    fn no_feed_means_no_efficiency() {
        let summary = feed_summary(&[], &[], &[milked(1, dec!(10))], date(1), date(3)).unwrap();
        assert_eq!(summary.efficiency, None);
        assert_eq!(summary.milk_litres, dec!(10));
    }
}
