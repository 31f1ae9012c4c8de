//! Per-activity cost rules. Every amount is in inflated dollars for the year.

use crate::error::SimulationError;
use crate::models::SiteConfig;

/// Removing `count` trees of mean diameter `dbh`.
pub fn removal(
    site: &SiteConfig,
    count: u64,
    dbh: f64,
    inflation: f64,
) -> Result<f64, SimulationError> {
    Ok(site.removal_costs.lookup(dbh)? * count as f64 * inflation)
}

/// Pruning a class of `count` trees: one tree in every pruning cycle is
/// pruned each year, priced at the class mean diameter.
pub fn pruning(
    site: &SiteConfig,
    count: u64,
    dbh: f64,
    inflation: f64,
) -> Result<f64, SimulationError> {
    let pruned = count as f64 / site.pruning_cycle_years as f64;
    Ok(site.pruning_costs.lookup(dbh)? * pruned * inflation)
}

/// Injecting `count` ash: each tree is treated once per injection cycle and
/// billed per cm of DBH.
pub fn injection(site: &SiteConfig, count: u64, dbh: f64, inflation: f64) -> f64 {
    let injected = count as f64 / site.injection_cycle_years as f64;
    injected * dbh * site.injection_cost_per_cm * inflation
}

/// Planting and establishing `count` new trees.
pub fn planting(site: &SiteConfig, count: u64, inflation: f64) -> f64 {
    count as f64 * site.planting_cost * inflation
}
