//! Expiry and low-stock alerts for medicine and feed.

use chrono::NaiveDate;
use core_types::{FeedInventory, MedicineItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockKind {
    Medicine,
    Feed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Expired,
    ExpiringSoon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryAlert {
    pub kind: StockKind,
    pub item_id: i64,
    pub name: String,
    pub expiry_date: NaiveDate,
    pub status: ExpiryStatus,
    /// Negative once the item has expired.
    pub days_until_expiry: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub item_id: i64,
    pub name: String,
    pub quantity: Decimal,
    pub reorder_level: Decimal,
    pub unit: String,
}

/// Classifies one expiry date. Something expiring today is still "soon",
/// with zero days left; it becomes expired tomorrow.
pub fn expiry_status(
    expiry: NaiveDate,
    today: NaiveDate,
    threshold_days: u32,
) -> Option<ExpiryStatus> {
    let days_left = (expiry - today).num_days();
    if days_left < 0 {
        Some(ExpiryStatus::Expired)
    } else if days_left <= i64::from(threshold_days) {
        Some(ExpiryStatus::ExpiringSoon)
    } else {
        None
    }
}

/// Alerts for every medicine, and every feed lot with an expiry date, that is
/// expired or expires within `threshold_days`. Soonest expiry first.
pub fn expiry_alerts(
    medicines: &[MedicineItem],
    feeds: &[FeedInventory],
    today: NaiveDate,
    threshold_days: u32,
) -> Vec<ExpiryAlert> {
    let medicine_dates = medicines
        .iter()
        .map(|m| (StockKind::Medicine, m.id, &m.name, m.expiry_date));
    let feed_dates = feeds
        .iter()
        .filter_map(|f| f.expiry_date.map(|d| (StockKind::Feed, f.id, &f.feed_name, d)));

    let mut alerts: Vec<ExpiryAlert> = medicine_dates
        .chain(feed_dates)
        .filter_map(|(kind, item_id, name, expiry_date)| {
            expiry_status(expiry_date, today, threshold_days).map(|status| ExpiryAlert {
                kind,
                item_id,
                name: name.clone(),
                expiry_date,
                status,
                days_until_expiry: (expiry_date - today).num_days(),
            })
        })
        .collect();
    alerts.sort_by_key(|a| (a.expiry_date, a.item_id));
    alerts
}

/// Medicines at or below their reorder level.
pub fn low_stock_alerts(medicines: &[MedicineItem]) -> Vec<LowStockAlert> {
    medicines
        .iter()
        .filter(|m| m.quantity <= m.reorder_level)
        .map(|m| LowStockAlert {
            item_id: m.id,
            name: m.name.clone(),
            quantity: m.quantity,
            reorder_level: m.reorder_level,
            unit: m.unit.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn medicine(id: i64, expires_in: i64, quantity: Decimal) -> MedicineItem {
        MedicineItem {
            id,
            name: format!("med-{id}"),
            category: "Vaccine".into(),
            quantity,
            unit: "dose".into(),
            expiry_date: today() + Duration::days(expires_in),
            cost_per_unit: None,
            supplier: None,
            reorder_level: dec!(10),
            notes: None,
        }
    }

    #[test]
    fn three_days_out_with_a_week_threshold_is_expiring_soon() {
        let alerts = expiry_alerts(&[medicine(1, 3, dec!(20))], &[], today(), 7);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].status, ExpiryStatus::ExpiringSoon);
        assert_eq!(alerts[0].days_until_expiry, 3);
    }

    #[test]
    fn boundaries() {
        assert_eq!(expiry_status(today(), today(), 30), Some(ExpiryStatus::ExpiringSoon));
        assert_eq!(
            expiry_status(today() - Duration::days(1), today(), 30),
            Some(ExpiryStatus::Expired)
        );
        assert_eq!(
            expiry_status(today() + Duration::days(30), today(), 30),
            Some(ExpiryStatus::ExpiringSoon)
        );
        assert_eq!(expiry_status(today() + Duration::days(31), today(), 30), None);
    }

    #[test]
    fn feed_without_expiry_is_never_flagged() {
        let feed = FeedInventory {
            id: 4,
            feed_name: "Dry straw".into(),
            category: "Roughage".into(),
            quantity_kg: dec!(900),
            unit_cost: dec!(4),
            purchase_date: today(),
            expiry_date: None,
            supplier: None,
            notes: None,
        };
        let mut expired = feed.clone();
        expired.id = 5;
        expired.expiry_date = Some(today() - Duration::days(2));

        let alerts = expiry_alerts(&[], &[feed, expired], today(), 30);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, StockKind::Feed);
        assert_eq!(alerts[0].status, ExpiryStatus::Expired);
        assert_eq!(alerts[0].days_until_expiry, -2);
    }

    #[test]
    fn alerts_are_ordered_by_expiry() {
        let meds = [medicine(1, 20, dec!(50)), medicine(2, -5, dec!(50)), medicine(3, 90, dec!(50))];
        let ids: Vec<i64> = expiry_alerts(&meds, &[], today(), 30)
            .iter()
            .map(|a| a.item_id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn reorder_level_itself_counts_as_low() {
        let meds = [medicine(1, 90, dec!(10)), medicine(2, 90, dec!(11))];
        let low = low_stock_alerts(&meds);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].item_id, 1);
    }
}
