//! Standalone HTML report with the transaction table and expense charts.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{
    transaction::Transaction,
    view::{
        aggregation::{expenses_by_category, expenses_by_month},
        charts::{ReportChart, report_charts},
        filter::{TransactionFilter, filter_and_sort},
    },
};

const ECHARTS_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

const TABLE_HEADER_STYLE: &str = "text-align: left; padding: 0.5rem; border-bottom: 2px solid #ccc";
const TABLE_CELL_STYLE: &str = "padding: 0.5rem; border-bottom: 1px solid #eee";

/// Render the report for `transactions`.
///
/// The table shows the transactions selected by `filter`, the charts always
/// summarise every expense.
pub fn render_report(transactions: &[Transaction], filter: &TransactionFilter) -> String {
    let rows = filter_and_sort(transactions, filter);
    let charts = report_charts(
        &expenses_by_category(transactions),
        &expenses_by_month(transactions),
    );

    base("Finance report", &charts, &report_view(&rows, &charts)).into_string()
}

fn base(title: &str, charts: &[ReportChart], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Finance Tracker" }
                script src=(ECHARTS_SCRIPT) {}
                script { (charts_script(charts)) }
            }

            body style="font-family: sans-serif; margin: 2rem"
            {
                (content)
            }
        }
    }
}

fn report_view(rows: &[&Transaction], charts: &[ReportChart]) -> Markup {
    html! {
        h1 { "Transactions" }

        section id="charts" style="display: grid; grid-template-columns: 1fr 1fr; gap: 1rem"
        {
            @for chart in charts {
                div id=(chart.id) style="min-height: 380px" {}
            }
        }

        (transaction_table(rows))
    }
}

/// Renders the transaction table, or a message if there are no rows.
pub fn transaction_table(rows: &[&Transaction]) -> Markup {
    html! {
        @if rows.is_empty() {
            p { "No transactions found." }
        } @else {
            table style="border-collapse: collapse; width: 100%"
            {
                thead
                {
                    tr
                    {
                        th style=(TABLE_HEADER_STYLE) { "Date" }
                        th style=(TABLE_HEADER_STYLE) { "Description" }
                        th style=(TABLE_HEADER_STYLE) { "Category" }
                        th style=(TABLE_HEADER_STYLE) { "Type" }
                        th style=(TABLE_HEADER_STYLE) { "Amount" }
                    }
                }

                tbody
                {
                    @for transaction in rows {
                        tr
                        {
                            td style=(TABLE_CELL_STYLE) { (transaction.occurred_on.to_string()) }
                            td style=(TABLE_CELL_STYLE) { (transaction.description) }
                            td style=(TABLE_CELL_STYLE) { (transaction.category) }
                            td style=(TABLE_CELL_STYLE) { (transaction.kind.as_str()) }
                            td style=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
                        }
                    }
                }
            }
        }
    }
}

/// Generates JavaScript initialization code for the report charts.
fn charts_script(charts: &[ReportChart]) -> PreEscaped<String> {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chart = echarts.init(document.getElementById("{}"));
                    chart.setOption({});
                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id,
                escape_script(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    PreEscaped(format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    ))
}

/// Escapes `<` so that text such as a category name of "</script>" cannot
/// end the script element early.
///
/// Only valid for script text where `<` appears inside string literals.
fn escape_script(script: &str) -> String {
    script.replace('<', "\\u003c")
}

/// Formats `amount` as dollars with two decimal places, e.g. "$1,234.50" or "-$5.00".
pub fn format_currency(amount: Decimal) -> String {
    static FORMATTER: OnceLock<Option<Formatter>> = OnceLock::new();

    let number = amount.abs().to_f64().unwrap_or_default();
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };

    let formatter = FORMATTER.get_or_init(|| {
        Formatter::currency("$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let formatted = match formatter {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        Some(_) if number == 0.0 => "$0.00".to_owned(),
        Some(formatter) => formatter.fmt_string(number),
        None => format!("${number:.2}"),
    };

    format!("{sign}{}", pad_cents(formatted))
}

/// numfmt omits trailing zeros, e.g. "12.30" is rendered as "12.3".
fn pad_cents(formatted: String) -> String {
    match formatted.rfind('.') {
        None => format!("{formatted}.00"),
        Some(point) => match formatted.len() - point - 1 {
            0 => format!("{formatted}00"),
            1 => format!("{formatted}0"),
            _ => formatted,
        },
    }
}
