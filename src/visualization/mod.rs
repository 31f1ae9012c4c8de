mod charts;
mod tables;

pub use charts::{format_metric_chart, print_metric_chart};
pub use tables::{
    format_policy_comparison, format_site_summary, format_sweep_optima, format_year_table,
    print_policy_comparison, print_site_summary, print_sweep_optima, print_year_table,
};
