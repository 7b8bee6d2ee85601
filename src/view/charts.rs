//! Chart generation for the expense report.
//!
//! Charts are built as ECharts configurations with `charming` and embedded in
//! the HTML report as JSON.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::{Bar, Pie},
};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::view::aggregation::{CategoryTotal, MonthlyTotals};

/// A report chart with its HTML container ID and ECharts configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// A pie chart of the total spent in each category.
pub fn category_chart(totals: &[CategoryTotal]) -> Chart {
    let data: Vec<(f64, &str)> = totals
        .iter()
        .map(|total| (to_f64(total.total), total.category.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Expenses by category"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().left("left").top("bottom"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["35%", "65%"])
                .data(data),
        )
}

/// A bar chart of the total spent in each month.
pub fn monthly_chart(monthly_totals: &MonthlyTotals) -> Chart {
    let values: Vec<f64> = monthly_totals.totals.iter().copied().map(to_f64).collect();

    Chart::new()
        .title(Title::new().text("Monthly expenses"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter())
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(monthly_totals.labels.clone()),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Expenses").data(values))
}

/// Build both report charts from the aggregated totals.
pub fn report_charts(
    category_totals: &[CategoryTotal],
    monthly_totals: &MonthlyTotals,
) -> Vec<ReportChart> {
    vec![
        ReportChart {
            id: "category-chart",
            options: category_chart(category_totals).to_string(),
        },
        ReportChart {
            id: "monthly-chart",
            options: monthly_chart(monthly_totals).to_string(),
        },
    ]
}

fn to_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}
