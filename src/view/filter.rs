//! Filtering, searching and sorting the transaction table.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use time::Date;

use crate::transaction::{Transaction, parse_amount, parse_date};

/// The column to sort the transaction table by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortField {
    /// Sort by the date the transaction happened.
    #[default]
    Date,
    /// Sort by amount, compared as numbers.
    Amount,
    /// Sort by category, compared as text.
    Category,
}

/// The direction to sort the transaction table in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortOrder {
    /// Smallest first.
    #[value(alias = "asc")]
    Ascending,
    /// Largest first.
    #[default]
    #[value(alias = "desc")]
    Descending,
}

/// The criteria for the transaction table.
///
/// Every criterion is optional and the active ones are combined with AND.
/// The builder methods take the raw text a user typed: empty text clears the
/// criterion and malformed numbers or dates are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    search_text: Option<String>,
    category: Option<String>,
    min_amount: Option<Decimal>,
    max_amount: Option<Decimal>,
    start_date: Option<Date>,
    end_date: Option<Date>,
    sort: Option<(SortField, SortOrder)>,
}

impl TransactionFilter {
    /// A filter with no criteria that keeps the input order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only keep transactions whose description contains `text`, ignoring case.
    pub fn search_text(mut self, text: &str) -> Self {
        self.search_text = non_empty(text).map(str::to_lowercase);
        self
    }

    /// Only keep transactions whose category is exactly `category`.
    pub fn category(mut self, category: &str) -> Self {
        self.category = non_empty(category).map(str::to_owned);
        self
    }

    /// Only keep transactions with an amount of at least `amount`.
    pub fn min_amount(mut self, amount: &str) -> Self {
        self.min_amount = non_empty(amount).and_then(parse_amount);
        self
    }

    /// Only keep transactions with an amount of at most `amount`.
    pub fn max_amount(mut self, amount: &str) -> Self {
        self.max_amount = non_empty(amount).and_then(parse_amount);
        self
    }

    /// Only keep transactions on or after `date`.
    pub fn start_date(mut self, date: &str) -> Self {
        self.start_date = non_empty(date).and_then(parse_date);
        self
    }

    /// Only keep transactions on or before `date`.
    pub fn end_date(mut self, date: &str) -> Self {
        self.end_date = non_empty(date).and_then(parse_date);
        self
    }

    /// Sort the filtered transactions by `field` in `order`.
    pub fn sort_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort = Some((field, order));
        self
    }

    /// Whether `transaction` meets every active criterion.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        let description_matches = self.search_text.as_ref().is_none_or(|text| {
            transaction
                .description
                .to_lowercase()
                .contains(text.as_str())
        });
        let category_matches = self
            .category
            .as_ref()
            .is_none_or(|category| &transaction.category == category);
        let amount_in_range = self.min_amount.is_none_or(|min| transaction.amount >= min)
            && self.max_amount.is_none_or(|max| transaction.amount <= max);
        let date_in_range = self
            .start_date
            .is_none_or(|start| transaction.occurred_on >= start)
            && self.end_date.is_none_or(|end| transaction.occurred_on <= end);

        description_matches && category_matches && amount_in_range && date_in_range
    }
}

/// `text` unchanged, or `None` if it is blank.
fn non_empty(text: &str) -> Option<&str> {
    (!text.trim().is_empty()).then_some(text)
}

/// Apply `filter` to `transactions` and sort the result.
///
/// The result keeps the input order for transactions that compare equal, so
/// sorting is stable. Without a sort field the filtered order is returned.
pub fn filter_and_sort<'a>(
    transactions: &'a [Transaction],
    filter: &TransactionFilter,
) -> Vec<&'a Transaction> {
    let mut rows: Vec<&Transaction> = transactions
        .iter()
        .filter(|transaction| filter.matches(transaction))
        .collect();

    if let Some((field, order)) = filter.sort {
        rows.sort_by(|a, b| {
            let ordering = compare_by(field, a, b);

            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
    }

    rows
}

fn compare_by(field: SortField, a: &Transaction, b: &Transaction) -> Ordering {
    match field {
        SortField::Date => a.occurred_on.cmp(&b.occurred_on),
        SortField::Amount => a.amount.cmp(&b.amount),
        SortField::Category => a.category.cmp(&b.category),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use time::{Date, macros::date};

    use crate::{
        OwnerId,
        transaction::{Transaction, TransactionKind},
        view::{SortField, SortOrder, TransactionFilter, filter_and_sort},
    };

    fn transaction(
        id: i64,
        description: &str,
        category: &str,
        amount: i64,
        kind: TransactionKind,
        occurred_on: Date,
    ) -> Transaction {
        Transaction {
            id,
            owner: OwnerId::new("owner-1"),
            kind,
            category: category.to_owned(),
            amount: Decimal::new(amount, 0),
            description: description.to_owned(),
            occurred_on,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
            updated_at: time::OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn coffee_and_pay() -> Vec<Transaction> {
        vec![
            transaction(1, "Coffee", "Food", 5, TransactionKind::Expense, date!(2025 - 01 - 10)),
            transaction(2, "Pay", "Salary", 1000, TransactionKind::Income, date!(2025 - 01 - 01)),
        ]
    }

    fn ids(rows: &[&Transaction]) -> Vec<i64> {
        rows.iter().map(|transaction| transaction.id).collect()
    }

    #[test]
    fn no_criteria_keeps_everything_in_order() {
        let transactions = coffee_and_pay();

        let rows = filter_and_sort(&transactions, &TransactionFilter::new());

        assert_eq!(ids(&rows), [1, 2]);
    }

    #[test]
    fn category_filter_is_exact() {
        let transactions = coffee_and_pay();

        let rows = filter_and_sort(&transactions, &TransactionFilter::new().category("Food"));
        assert_eq!(ids(&rows), [1]);

        let rows = filter_and_sort(&transactions, &TransactionFilter::new().category("Foo"));
        assert!(rows.is_empty());
    }

    #[test]
    fn search_ignores_case() {
        let transactions = coffee_and_pay();

        let rows = filter_and_sort(&transactions, &TransactionFilter::new().search_text("cOf"));

        assert_eq!(ids(&rows), [1]);
    }

    #[test]
    fn category_and_search_text_are_not_trimmed() {
        let transactions = vec![
            transaction(
                1,
                "Coffee beans",
                "Food",
                20,
                TransactionKind::Expense,
                date!(2025 - 01 - 12),
            ),
            transaction(2, "Beans", "Food", 3, TransactionKind::Expense, date!(2025 - 01 - 13)),
        ];

        let rows = filter_and_sort(&transactions, &TransactionFilter::new().category(" Food"));
        assert!(rows.is_empty());

        let rows = filter_and_sort(&transactions, &TransactionFilter::new().search_text(" beans"));
        assert_eq!(ids(&rows), [1]);
    }

    #[test]
    fn amount_and_date_bounds_are_inclusive() {
        let transactions = coffee_and_pay();

        let rows = filter_and_sort(
            &transactions,
            &TransactionFilter::new().min_amount("5").max_amount("5"),
        );
        assert_eq!(ids(&rows), [1]);

        let rows = filter_and_sort(
            &transactions,
            &TransactionFilter::new()
                .start_date("2025-01-01")
                .end_date("2025-01-01"),
        );
        assert_eq!(ids(&rows), [2]);
    }

    #[test]
    fn empty_and_malformed_input_is_no_filter() {
        let transactions = coffee_and_pay();
        let filter = TransactionFilter::new()
            .search_text("")
            .category("  ")
            .min_amount("lots")
            .max_amount("")
            .start_date("last week")
            .end_date("");

        assert_eq!(filter, TransactionFilter::new());
        assert_eq!(ids(&filter_and_sort(&transactions, &filter)), [1, 2]);
    }

    #[test]
    fn criteria_are_combined() {
        let transactions = vec![
            transaction(1, "Coffee", "Food", 5, TransactionKind::Expense, date!(2025 - 01 - 10)),
            transaction(
                2,
                "Coffee beans",
                "Food",
                20,
                TransactionKind::Expense,
                date!(2025 - 01 - 12),
            ),
            transaction(3, "Coffee", "Gifts", 5, TransactionKind::Expense, date!(2025 - 01 - 10)),
        ];

        let rows = filter_and_sort(
            &transactions,
            &TransactionFilter::new()
                .search_text("coffee")
                .category("Food")
                .max_amount("10"),
        );

        assert_eq!(ids(&rows), [1]);
    }

    #[test]
    fn sorts_by_amount_numerically() {
        let transactions = vec![
            transaction(1, "a", "Food", 100, TransactionKind::Expense, date!(2025 - 01 - 01)),
            transaction(2, "b", "Food", 9, TransactionKind::Expense, date!(2025 - 01 - 02)),
            transaction(3, "c", "Food", 20, TransactionKind::Expense, date!(2025 - 01 - 03)),
        ];

        let ascending = filter_and_sort(
            &transactions,
            &TransactionFilter::new().sort_by(SortField::Amount, SortOrder::Ascending),
        );
        let descending = filter_and_sort(
            &transactions,
            &TransactionFilter::new().sort_by(SortField::Amount, SortOrder::Descending),
        );

        assert_eq!(ids(&ascending), [2, 3, 1]);
        assert_eq!(ids(&descending), [1, 3, 2]);
    }

    #[test]
    fn sort_by_amount_puts_coffee_first() {
        let transactions = coffee_and_pay();

        let rows = filter_and_sort(
            &transactions,
            &TransactionFilter::new().sort_by(SortField::Amount, SortOrder::Ascending),
        );

        assert_eq!(ids(&rows), [1, 2]);
    }

    #[test]
    fn sort_keeps_ties_in_filtered_order_in_both_directions() {
        let transactions = vec![
            transaction(1, "a", "Food", 5, TransactionKind::Expense, date!(2025 - 01 - 02)),
            transaction(2, "b", "Bills", 5, TransactionKind::Expense, date!(2025 - 01 - 01)),
            transaction(3, "c", "Food", 5, TransactionKind::Expense, date!(2025 - 01 - 02)),
        ];

        let by_date_ascending = filter_and_sort(
            &transactions,
            &TransactionFilter::new().sort_by(SortField::Date, SortOrder::Ascending),
        );
        let by_date_descending = filter_and_sort(
            &transactions,
            &TransactionFilter::new().sort_by(SortField::Date, SortOrder::Descending),
        );
        let by_category = filter_and_sort(
            &transactions,
            &TransactionFilter::new().sort_by(SortField::Category, SortOrder::Ascending),
        );

        assert_eq!(ids(&by_date_ascending), [2, 1, 3]);
        assert_eq!(ids(&by_date_descending), [1, 3, 2]);
        assert_eq!(ids(&by_category), [2, 1, 3]);
    }

    #[test]
    fn filtered_result_is_an_ordered_subset() {
        let transactions = vec![
            transaction(1, "Lunch", "Food", 12, TransactionKind::Expense, date!(2025 - 02 - 01)),
            transaction(2, "Bus", "Transport", 3, TransactionKind::Expense, date!(2025 - 02 - 02)),
            transaction(3, "Dinner", "Food", 30, TransactionKind::Expense, date!(2025 - 02 - 03)),
            transaction(4, "Snack", "Food", 2, TransactionKind::Expense, date!(2025 - 02 - 04)),
        ];

        let rows = filter_and_sort(&transactions, &TransactionFilter::new().category("Food"));

        assert_eq!(ids(&rows), [1, 3, 4]);
    }
}
