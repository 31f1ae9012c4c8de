use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::models::{Policy, SiteConfig, YearRecord};
use crate::simulation::{Metric, Optimum, PolicyRun};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn title(output: &mut String, text: &str, width: usize) {
    output.push_str(&format!("\n{}\n", text.bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(width)));
}

/// Dollar amount rounded to cents.
fn money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", -value)
    } else {
        format!("${value:.2}")
    }
}

fn metric_cell(metric: Metric, value: f64) -> String {
    match metric {
        Metric::TotalCount => format!("{value:.0}"),
        Metric::TotalBasalArea => format!("{value:.2} cm²"),
        Metric::CumulativeCost | Metric::TotalValue | Metric::NetValue => money(value),
    }
}

/// Format the key parameters of a site as a string.
pub fn format_site_summary(site: &SiteConfig) -> String {
    let mut output = String::new();
    title(&mut output, &format!("Site: {}", site.name), 50);

    let mut table = new_table(vec!["Parameter", "Value", "Unit"]);
    let rows = [
        ("Horizon", format!("{}", site.horizon_years), "years"),
        ("Ash Trees", format!("{}", site.legacy_count), "trees"),
        ("Ash Mean DBH", format!("{:.2}", site.legacy_dbh), "cm"),
        ("Ash Growth", format!("{:.4}", site.legacy_growth), "cm/yr"),
        (
            "Untreated Mortality",
            format!("{:.1}%", site.untreated_mortality * 100.0),
            "per year",
        ),
        (
            "Treated Mortality",
            format!("{:.1}%", site.treated_mortality * 100.0),
            "per year",
        ),
        ("Planting DBH", format!("{:.1}", site.planting_dbh), "cm"),
        ("Planting Cost", money(site.planting_cost), "per tree"),
        ("Injection Cost", money(site.injection_cost_per_cm), "per cm DBH"),
        (
            "Inflation",
            format!("{:.1}%", site.inflation_rate * 100.0),
            "per year",
        ),
    ];
    for (name, value, unit) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value), Cell::new(unit)]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the key parameters of a site.
pub fn print_site_summary(site: &SiteConfig) {
    print!("{}", format_site_summary(site));
}

/// Format one run as a year-by-year table.
pub fn format_year_table(policy: &Policy, records: &[YearRecord]) -> String {
    let mut output = String::new();
    title(&mut output, &policy.to_string(), 90);

    let mut table = new_table(vec![
        "Year",
        "Phase",
        "Ash",
        "Replacement",
        "Total",
        "Basal Area (cm²)",
        "Annual Cost",
        "Cumulative Cost",
        "Total Value",
        "Net Value",
    ]);

    for r in records {
        table.add_row(vec![
            Cell::new(r.year),
            Cell::new(r.phase),
            Cell::new(r.legacy.count),
            Cell::new(r.replacement.count),
            Cell::new(r.total_count),
            Cell::new(format!("{:.2}", r.total_basal_area)),
            Cell::new(money(r.annual_cost.total())),
            Cell::new(money(r.cumulative_cost.total())),
            Cell::new(money(r.total_value)),
            Cell::new(money(r.net_value)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print one run as a year-by-year table.
pub fn print_year_table(policy: &Policy, records: &[YearRecord]) {
    print!("{}", format_year_table(policy, records));
}

/// Format final-year counts, costs and values side by side for several runs.
pub fn format_policy_comparison(runs: &[PolicyRun]) -> String {
    let mut output = String::new();
    let year = runs
        .iter()
        .filter_map(|run| run.final_record())
        .map(|r| r.year)
        .max()
        .unwrap_or(0);
    title(&mut output, &format!("Year {year} Comparison"), 90);

    let mut table = new_table(vec![
        "Policy",
        "Ash",
        "Replacement",
        "Total",
        "Basal Area (cm²)",
        "Cumulative Cost",
        "Total Value",
        "Net Value",
    ]);

    for run in runs {
        let Some(last) = run.final_record() else {
            continue;
        };
        table.add_row(vec![
            Cell::new(run.policy),
            Cell::new(last.legacy.count),
            Cell::new(last.replacement.count),
            Cell::new(last.total_count),
            Cell::new(format!("{:.2}", last.total_basal_area)),
            Cell::new(money(last.cumulative_cost.total())),
            Cell::new(money(last.total_value)),
            Cell::new(money(last.net_value)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the final-year policy comparison.
pub fn print_policy_comparison(runs: &[PolicyRun]) {
    print!("{}", format_policy_comparison(runs));
}

/// Format the best policy per metric from a sweep.
pub fn format_sweep_optima(optima: &[Optimum], combinations: usize) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Sweep Optima".bold().green()));
    output.push_str(&format!(
        "{}\n",
        format!("{combinations} parameter combinations").dimmed()
    ));
    output.push_str(&format!("{}\n", "=".repeat(70)));

    if optima.is_empty() {
        output.push_str("  No results.\n");
        return output;
    }

    let mut table = new_table(vec!["Metric", "Goal", "Best Value", "Year", "Policy"]);
    for opt in optima {
        table.add_row(vec![
            Cell::new(opt.metric),
            Cell::new(if opt.metric.minimize() { "min" } else { "max" }),
            Cell::new(metric_cell(opt.metric, opt.value)),
            Cell::new(opt.year),
            Cell::new(opt.policy),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the best policy per metric from a sweep.
pub fn print_sweep_optima(optima: &[Optimum], combinations: usize) {
    print!("{}", format_sweep_optima(optima, combinations));
}
