use tracing::{debug, info, warn};

use super::costs;
use super::legacy::LegacyStand;
use super::replacement::ReplacementStand;
use super::valuation;
use crate::error::SimulationError;
use crate::models::{CohortTiming, CostBreakdown, Policy, SiteConfig, YearRecord};

/// Run one policy over the site's horizon and return one record per year.
///
/// The run either completes every year or fails; a cost lookup failure in any
/// year aborts it and no records are returned.
pub fn simulate(site: &SiteConfig, policy: &Policy) -> Result<Vec<YearRecord>, SimulationError> {
    site.validate()?;

    let rules = policy.rules();
    let schedule = policy.planting_schedule();

    let mut legacy = LegacyStand::from_site(site);
    let mut replacement = ReplacementStand::new();
    let mut cumulative = CostBreakdown::default();
    let mut inflation = 1.0;
    let mut previous_replacement_count = 0;
    let mut records = Vec::with_capacity(site.horizon_years as usize);

    for year in 1..=site.horizon_years {
        let phase = policy.phase(year);
        let mut annual = CostBreakdown::default();

        let lost = legacy.step(phase, rules.injection_basis, site, inflation)?;
        annual.removal += lost.removal_cost;
        annual.injection += lost.injection_cost;

        let mut pending = 0;
        if rules.replant_losses && lost.lost > 0 {
            annual.planting += costs::planting(site, lost.lost, inflation);
            match rules.cohort_timing {
                CohortTiming::BeforeStep => replacement.plant(lost.lost, site.planting_dbh),
                CohortTiming::AfterStep => pending = lost.lost,
            }
        }

        if let Some(schedule) = schedule {
            let batch = schedule.batch(year, site.legacy_count, previous_replacement_count);
            replacement.plant(batch, site.planting_dbh);
            if schedule.is_charged(year) {
                if year < schedule.start_year {
                    warn!(
                        year,
                        planting_year = schedule.start_year,
                        "planting charged before the planting start year; nothing planted"
                    );
                } else {
                    annual.planting += costs::planting(site, batch, inflation);
                }
            }
        }

        let cohorts = replacement.step(site, rules.young_loss_charge, inflation)?;
        annual.removal += cohorts.removal_cost;
        annual.planting += cohorts.replanting_cost;

        let replacement_count = replacement.count();
        let replacement_dbh = replacement.mean_dbh(site.planting_dbh);
        // Losses planted after the step join the stand from next year.
        replacement.plant(pending, site.planting_dbh);

        if rules.prune_legacy {
            annual.pruning += costs::pruning(site, legacy.count, legacy.dbh, inflation)?;
        }
        annual.pruning += costs::pruning(site, replacement_count, replacement_dbh, inflation)?;

        cumulative += annual;

        let legacy_snapshot = valuation::snapshot(
            site,
            &site.legacy_depreciation,
            legacy.count,
            legacy.dbh,
            inflation,
        );
        let replacement_snapshot = valuation::snapshot(
            site,
            &site.replacement_depreciation,
            replacement_count,
            replacement_dbh,
            inflation,
        );

        debug!(
            year,
            %phase,
            legacy = legacy.count,
            replacement = replacement_count,
            cohorts = replacement.cohorts.len(),
            "simulated year"
        );

        records.push(YearRecord::new(
            year,
            phase,
            inflation,
            legacy_snapshot,
            replacement_snapshot,
            annual,
            cumulative,
        )?);

        previous_replacement_count = replacement_count;
        inflation *= 1.0 + site.inflation_rate;
    }

    if let Some(last) = records.last() {
        info!(
            policy = %policy,
            site = %site.name,
            years = site.horizon_years,
            net_value = last.net_value,
            "simulation complete"
        );
    }

    Ok(records)
}
