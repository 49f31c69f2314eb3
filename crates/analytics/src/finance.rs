//! Income and expense rollups.

use crate::error::{period, AnalyticsError};
use chrono::{Datelike, NaiveDate};
use core_types::{Direction, FinancialTransaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub direction: Direction,
    pub category: String,
    pub total: Decimal,
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyNet {
    /// `YYYY-MM`.
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net: Decimal,
    /// Income categories first, then expenses; each by name.
    pub by_category: Vec<CategoryTotal>,
    pub monthly: Vec<MonthlyNet>,
}

pub(crate) fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Totals the ledger entries dated between `start` and `end` inclusive.
pub fn financial_summary(
    transactions: &[FinancialTransaction],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<FinancialSummary, AnalyticsError> {
    let range = period(start, end)?;

    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut categories: BTreeMap<(Direction, &str), (Decimal, usize)> = BTreeMap::new();
    let mut months: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();

    for entry in transactions.iter().filter(|t| range.contains(t.date)) {
        let month = months.entry(month_key(entry.date)).or_default();
        match entry.direction {
            Direction::Income => {
                total_income += entry.amount;
                month.0 += entry.amount;
            }
            Direction::Expense => {
                total_expense += entry.amount;
                month.1 += entry.amount;
            }
        }
        let slot = categories
            .entry((entry.direction, entry.category.as_str()))
            .or_default();
        slot.0 += entry.amount;
        slot.1 += 1;
    }

    let by_category = categories
        .into_iter()
        .map(|((direction, category), (total, entries))| CategoryTotal {
            direction,
            category: category.to_string(),
            total,
            entries,
        })
        .collect();

    let monthly = months
        .into_iter()
        .map(|(month, (income, expense))| MonthlyNet {
            month,
            income,
            expense,
            net: income - expense,
        })
        .collect();

    Ok(FinancialSummary {
        start,
        end,
        total_income,
        total_expense,
        net: total_income - total_expense,
        by_category,
        monthly,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(m: u32, d: u32, direction: Direction, category: &str, amount: Decimal) -> FinancialTransaction {
        FinancialTransaction {
            id: 0,
            date: NaiveDate::from_ymd_opt(2025, m, d).unwrap(),
            direction,
            category: category.into(),
            subcategory: None,
            amount,
            description: "entry".into(),
            reference_id: None,
            notes: None,
        }
    }

    fn may() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
        )
    }

    #[test]
    fn net_is_income_minus_expense() {
        let ledger = vec![
            entry(5, 3, Direction::Income, "Milk Sales", dec!(100)),
            entry(5, 9, Direction::Expense, "Feed", dec!(40)),
        ];
        let (start, end) = may();
        let summary = financial_summary(&ledger, start, end).unwrap();
        assert_eq!(summary.total_income, dec!(100));
        assert_eq!(summary.total_expense, dec!(40));
        assert_eq!(summary.net, dec!(60));
    }

    #[test]
    fn categories_are_grouped_per_direction() {
        let ledger = vec![
            entry(5, 1, Direction::Expense, "Feed", dec!(10)),
            entry(5, 2, Direction::Expense, "Feed", dec!(15)),
            entry(5, 2, Direction::Income, "Feed", dec!(5)),
            entry(6, 2, Direction::Expense, "Feed", dec!(999)),
        ];
        let (start, end) = may();
        let summary = financial_summary(&ledger, start, end).unwrap();
        assert_eq!(summary.by_category.len(), 2);
        assert_eq!(summary.by_category[0].direction, Direction::Income);
        assert_eq!(summary.by_category[1].total, dec!(25));
        assert_eq!(summary.by_category[1].entries, 2);
    }

    #[test]
    fn monthly_series_spans_the_range() {
        let ledger = vec![
            entry(4, 30, Direction::Income, "Milk Sales", dec!(70)),
            entry(5, 1, Direction::Expense, "Vet", dec!(20)),
        ];
        let start = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let (_, end) = may();
        let summary = financial_summary(&ledger, start, end).unwrap();
        let months: Vec<_> = summary.monthly.iter().map(|m| (m.month.as_str(), m.net)).collect();
        assert_eq!(months, vec![("2025-04", dec!(70)), ("2025-05", dec!(-20))]);
    }

    #[test]
    fn empty_ledger_is_all_zero() {
        let (start, end) = may();
        let summary = financial_summary(&[], start, end).unwrap();
        assert_eq!(summary.net, Decimal::ZERO);
        assert!(summary.by_category.is_empty());
        assert!(summary.monthly.is_empty());
    }
}
