//! Expense totals for charts.
//!
//! Both aggregations only look at expenses, income is ignored. Totals
//! saturate at [Decimal::MAX] and [Decimal::MIN] instead of overflowing.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use time::{Date, Month};

use crate::transaction::{Transaction, TransactionKind};

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category label.
    pub category: String,
    /// The sum of the expense amounts in the category.
    pub total: Decimal,
}

/// Expense totals per calendar month, oldest month first.
///
/// `labels` and `totals` always have the same length and the total at an
/// index belongs to the label at the same index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyTotals {
    /// Month labels such as "Jan 2025".
    pub labels: Vec<String>,
    /// The sum of the expense amounts in each month.
    pub totals: Vec<Decimal>,
}

/// Sums expense amounts per category.
///
/// Categories are listed in the order they are first seen in `transactions`.
/// Categories with no expenses are not listed.
pub fn expenses_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for transaction in expenses(transactions) {
        match totals
            .iter_mut()
            .find(|total| total.category == transaction.category)
        {
            Some(total) => total.total = total.total.saturating_add(transaction.amount),
            None => totals.push(CategoryTotal {
                category: transaction.category.clone(),
                total: transaction.amount,
            }),
        }
    }

    totals
}

/// Sums expense amounts per calendar month, sorted chronologically.
pub fn expenses_by_month(transactions: &[Transaction]) -> MonthlyTotals {
    let mut totals: BTreeMap<(i32, u8), Decimal> = BTreeMap::new();

    for transaction in expenses(transactions) {
        let total = totals.entry(month_key(transaction.occurred_on)).or_default();
        *total = total.saturating_add(transaction.amount);
    }

    let (labels, totals) = totals
        .into_iter()
        .map(|((year, month), total)| (format_month_label(year, month), total))
        .unzip();

    MonthlyTotals { labels, totals }
}

fn expenses(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionKind::Expense)
}

fn month_key(date: Date) -> (i32, u8) {
    (date.year(), date.month() as u8)
}

/// Formats a month as a three-letter abbreviation and the year, e.g. "Jan 2025".
fn format_month_label(year: i32, month: u8) -> String {
    let month = Month::try_from(month).map_or("???", |month| match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    });

    format!("{month} {year}")
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use time::{Date, OffsetDateTime, macros::date};

    use crate::{
        OwnerId,
        transaction::{Transaction, TransactionKind},
        view::{CategoryTotal, expenses_by_category, expenses_by_month},
    };

    fn transaction(category: &str, kind: TransactionKind, amount: i64, date: Date) -> Transaction {
        Transaction {
            id: 0,
            owner: OwnerId::new("owner-1"),
            kind,
            category: category.to_owned(),
            amount: Decimal::new(amount, 0),
            description: String::new(),
            occurred_on: date,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn category_totals_only_count_expenses() {
        let transactions = vec![
            transaction("Food", TransactionKind::Expense, 5, date!(2025 - 01 - 10)),
            transaction("Food", TransactionKind::Expense, 3, date!(2025 - 01 - 11)),
            transaction("Transport", TransactionKind::Expense, 2, date!(2025 - 01 - 12)),
            transaction("Salary", TransactionKind::Income, 1000, date!(2025 - 01 - 01)),
        ];

        let totals = expenses_by_category(&transactions);

        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    category: "Food".to_owned(),
                    total: Decimal::new(8, 0),
                },
                CategoryTotal {
                    category: "Transport".to_owned(),
                    total: Decimal::new(2, 0),
                },
            ]
        );
    }

    #[test]
    fn category_totals_keep_first_seen_order() {
        let transactions = vec![
            transaction("Transport", TransactionKind::Expense, 2, date!(2025 - 01 - 12)),
            transaction("Food", TransactionKind::Expense, 5, date!(2025 - 01 - 10)),
            transaction("Transport", TransactionKind::Expense, 4, date!(2025 - 01 - 13)),
        ];

        let categories: Vec<_> = expenses_by_category(&transactions)
            .into_iter()
            .map(|total| total.category)
            .collect();

        assert_eq!(categories, ["Transport", "Food"]);
    }

    #[test]
    fn category_totals_sum_to_total_expenses() {
        let transactions = vec![
            transaction("Food", TransactionKind::Expense, 5, date!(2025 - 01 - 10)),
            transaction("Rent", TransactionKind::Expense, 700, date!(2025 - 02 - 01)),
            transaction("Food", TransactionKind::Expense, 12, date!(2025 - 02 - 03)),
            transaction("Salary", TransactionKind::Income, 1000, date!(2025 - 01 - 01)),
        ];

        let sum: Decimal = expenses_by_category(&transactions)
            .iter()
            .map(|total| total.total)
            .sum();

        assert_eq!(sum, Decimal::new(717, 0));
    }

    #[test]
    fn no_expenses_gives_no_totals() {
        let transactions = vec![transaction(
            "Salary",
            TransactionKind::Income,
            1000,
            date!(2025 - 01 - 01),
        )];

        assert!(expenses_by_category(&transactions).is_empty());
        assert!(expenses_by_month(&transactions).labels.is_empty());
    }

    #[test]
    fn monthly_totals_are_chronological() {
        let transactions = vec![
            transaction("Food", TransactionKind::Expense, 4, date!(2025 - 02 - 14)),
            transaction("Food", TransactionKind::Expense, 5, date!(2025 - 01 - 10)),
            transaction("Food", TransactionKind::Expense, 6, date!(2025 - 02 - 01)),
            transaction("Salary", TransactionKind::Income, 1000, date!(2025 - 01 - 01)),
        ];

        let monthly = expenses_by_month(&transactions);

        assert_eq!(monthly.labels, ["Jan 2025", "Feb 2025"]);
        assert_eq!(monthly.totals, [Decimal::new(5, 0), Decimal::new(10, 0)]);
    }

    #[test]
    fn monthly_totals_sort_across_years() {
        let transactions = vec![
            transaction("Food", TransactionKind::Expense, 1, date!(2026 - 01 - 05)),
            transaction("Food", TransactionKind::Expense, 2, date!(2025 - 12 - 31)),
            transaction("Food", TransactionKind::Expense, 3, date!(2025 - 01 - 01)),
        ];

        let monthly = expenses_by_month(&transactions);

        assert_eq!(monthly.labels, ["Jan 2025", "Dec 2025", "Jan 2026"]);
    }

    #[test]
    fn huge_totals_saturate_instead_of_overflowing() {
        let huge = Decimal::from_str_exact("50000000000000000000000000000").unwrap();
        let transactions: Vec<_> = [date!(2025 - 01 - 10), date!(2025 - 01 - 11)]
            .into_iter()
            .map(|date| Transaction {
                amount: huge,
                ..transaction("Food", TransactionKind::Expense, 0, date)
            })
            .collect();

        let by_category = expenses_by_category(&transactions);
        let by_month = expenses_by_month(&transactions);

        assert_eq!(by_category[0].total, Decimal::MAX);
        assert_eq!(by_month.totals, [Decimal::MAX]);
    }
}
