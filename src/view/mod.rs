//! Derived, read-only views over a list of transactions.
//!
//! Everything here is a pure function of the transactions it is given:
//! - the filtered and sorted transaction table,
//! - expense totals per category and per month,
//! - the ECharts charts and HTML report built from those totals.

mod aggregation;
mod charts;
mod filter;
mod report;

pub use aggregation::{CategoryTotal, MonthlyTotals, expenses_by_category, expenses_by_month};
pub use charts::{ReportChart, category_chart, monthly_chart, report_charts};
pub use filter::{SortField, SortOrder, TransactionFilter, filter_and_sort};
pub use report::{format_currency, render_report, transaction_table};
