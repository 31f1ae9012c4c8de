use colored::Colorize;

use crate::models::YearRecord;
use crate::simulation::Metric;

/// Format a text bar chart of `metric` over the years of one run.
///
/// Bars are scaled to the largest absolute value; negative values are drawn
/// in red.
pub fn format_metric_chart(records: &[YearRecord], metric: Metric) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", metric.to_string().bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    if records.is_empty() {
        output.push_str("  No data available.\n");
        return output;
    }

    let values: Vec<f64> = records.iter().map(|r| metric.value(r)).collect();
    let max_abs = values.iter().map(|v| v.abs()).fold(0.0f64, f64::max);
    let bar_width = 40;

    output.push_str(&format!("  {:>4}  {:>16}  Trend\n", "Year", "Value"));
    output.push_str(&format!("  {}\n", "-".repeat(66)));

    for (record, value) in records.iter().zip(&values) {
        let bar_len = if max_abs > 0.0 {
            ((value.abs() / max_abs) * bar_width as f64).round() as usize
        } else {
            0
        };
        let bar = "\u{2588}".repeat(bar_len);
        let bar = if *value < 0.0 { bar.red() } else { bar.green() };

        output.push_str(&format!(
            "  {:>4}  {:>16.2}  {}\n",
            record.year, value, bar
        ));
    }

    output.push('\n');
    output
}

/// Print a text bar chart of `metric` over the years of one run.
pub fn print_metric_chart(records: &[YearRecord], metric: Metric) {
    print!("{}", format_metric_chart(records, metric));
}
