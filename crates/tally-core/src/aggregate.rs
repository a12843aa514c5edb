//! Month/category aggregation
//!
//! Totals keep first-seen order at both levels: months appear in the order
//! their first expense was read, and categories within a month likewise.
//! Sums are checked, so an amount that would overflow `Decimal` is an error
//! instead of a panic.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{MonthKey, Record};

/// Summed amounts per month, then per category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyCategoryTotals {
    months: IndexMap<MonthKey, MonthTotals>,
    record_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct MonthTotals {
    categories: IndexMap<String, Decimal>,
    total: Decimal,
}

impl MonthlyCategoryTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one record into its month and category
    ///
    /// Fails without changing anything if either the category total or the
    /// month total would overflow.
    pub fn add(&mut self, record: &Record) -> Result<()> {
        let key = record.month_key();
        let overflow = || Error::AmountOverflow {
            month: key.to_string(),
            category: record.category.clone(),
        };

        let month = self.months.entry(key).or_default();
        let category_total = month
            .categories
            .get(&record.category)
            .copied()
            .unwrap_or(Decimal::ZERO)
            .checked_add(record.amount)
            .ok_or_else(overflow)?;
        let month_total = month
            .total
            .checked_add(record.amount)
            .ok_or_else(overflow)?;

        month.categories.insert(record.category.clone(), category_total);
        month.total = month_total;
        self.record_count += 1;
        Ok(())
    }

    /// Months in first-seen order, each with its categories in first-seen order
    pub fn months(&self) -> impl Iterator<Item = (&MonthKey, &IndexMap<String, Decimal>)> {
        self.months.iter().map(|(key, month)| (key, &month.categories))
    }

    /// Categories for a single month
    pub fn categories(&self, month: &MonthKey) -> Option<&IndexMap<String, Decimal>> {
        self.months.get(month).map(|m| &m.categories)
    }

    /// Total for one category in one month
    pub fn get(&self, month: &MonthKey, category: &str) -> Option<Decimal> {
        self.months.get(month)?.categories.get(category).copied()
    }

    /// Sum of every category total in a month; zero for unknown months
    pub fn month_total(&self, month: &MonthKey) -> Decimal {
        self.months
            .get(month)
            .map(|m| m.total)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn month_count(&self) -> usize {
        self.months.len()
    }

    /// Number of records folded in
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Fold records, in input order, into monthly category totals
pub fn aggregate<'a, I>(records: I) -> Result<MonthlyCategoryTotals>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut totals = MonthlyCategoryTotals::new();
    for record in records {
        totals.add(record)?;
    }

    debug!(
        "Aggregated {} records into {} months",
        totals.record_count(),
        totals.month_count()
    );
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(category: &str, amount: Decimal, y: i32, m: u32, d: u32) -> Record {
        Record {
            category: category.to_string(),
            amount,
            details: String::new(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        }
    }

    #[test]
    fn test_empty() {
        let totals = aggregate(&Vec::<Record>::new()).unwrap();
        assert!(totals.is_empty());
        assert_eq!(totals.month_count(), 0);
        assert_eq!(totals.record_count(), 0);
        assert_eq!(totals.month_total(&MonthKey::new(2025, 9)), Decimal::ZERO);
    }

    #[test]
    fn test_exact_sum() {
        let records = vec![
            record("Food", dec!(12.50), 2025, 9, 1),
            record("Transport", dec!(5.00), 2025, 9, 1),
        ];
        let totals = aggregate(&records).unwrap();
        let sep = MonthKey::new(2025, 9);

        assert_eq!(totals.get(&sep, "Food"), Some(dec!(12.50)));
        assert_eq!(totals.get(&sep, "Transport"), Some(dec!(5.00)));
        assert_eq!(totals.month_total(&sep), dec!(17.50));
    }

    #[test]
    fn test_no_float_drift() {
        // 0.1 added ten times is exactly 1 in decimal
        let records: Vec<_> = (0..10)
            .map(|_| record("Coffee", dec!(0.10), 2025, 1, 5))
            .collect();
        let totals = aggregate(&records).unwrap();
        assert_eq!(totals.get(&MonthKey::new(2025, 1), "Coffee"), Some(dec!(1.00)));
    }

    #[test]
    fn test_first_seen_order_not_alphabetical() {
        let records = vec![
            record("Transport", dec!(1), 2025, 10, 3),
            record("Food", dec!(1), 2025, 10, 1),
            record("Zoo", dec!(1), 2025, 9, 30),
            record("Apples", dec!(1), 2025, 9, 1),
            record("Food", dec!(2), 2025, 10, 20),
        ];
        let totals = aggregate(&records).unwrap();

        let months: Vec<_> = totals.months().map(|(m, _)| m.to_string()).collect();
        assert_eq!(months, vec!["2025-10", "2025-09"]);

        let october: Vec<_> = totals
            .categories(&MonthKey::new(2025, 10))
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(october, vec!["Transport", "Food"]);

        let september: Vec<_> = totals
            .categories(&MonthKey::new(2025, 9))
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(september, vec!["Zoo", "Apples"]);

        assert_eq!(totals.get(&MonthKey::new(2025, 10), "Food"), Some(dec!(3)));
        assert_eq!(totals.record_count(), 5);
    }

    #[test]
    fn test_same_month_different_years_are_separate() {
        let records = vec![
            record("Rent", dec!(900), 2024, 9, 1),
            record("Rent", dec!(950), 2025, 9, 1),
        ];
        let totals = aggregate(&records).unwrap();
        assert_eq!(totals.month_count(), 2);
        assert_eq!(totals.month_total(&MonthKey::new(2024, 9)), dec!(900));
        assert_eq!(totals.month_total(&MonthKey::new(2025, 9)), dec!(950));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let mut totals = MonthlyCategoryTotals::new();
        totals.add(&record("Food", Decimal::MAX, 2025, 9, 1)).unwrap();

        let result = totals.add(&record("Food", dec!(1), 2025, 9, 2));
        assert!(matches!(
            result,
            Err(Error::AmountOverflow { ref month, ref category })
                if month == "2025-09" && category == "Food"
        ));

        // Failed add leaves the totals as they were
        assert_eq!(totals.get(&MonthKey::new(2025, 9), "Food"), Some(Decimal::MAX));
        assert_eq!(totals.record_count(), 1);
    }

    #[test]
    fn test_month_total_overflow_across_categories() {
        let records = vec![
            record("Rent", Decimal::MAX, 2025, 9, 1),
            record("Food", dec!(1), 2025, 9, 2),
        ];
        assert!(matches!(
            aggregate(&records),
            Err(Error::AmountOverflow { .. })
        ));
    }
}
