use serde::{Deserialize, Serialize};

use super::costs;
use crate::error::SimulationError;
use crate::models::{Cohort, SiteConfig, YoungLossCharge};

/// Costs and losses from one year of cohort updates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CohortStepOutcome {
    pub deaths: u64,
    pub removal_cost: f64,
    pub replanting_cost: f64,
}

/// Every living replacement cohort, in planting order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplacementStand {
    pub cohorts: Vec<Cohort>,
}

impl ReplacementStand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new cohort of `count` trees. Empty batches are not recorded.
    pub fn plant(&mut self, count: u64, dbh: f64) {
        if count > 0 {
            self.cohorts.push(Cohort::planted(count, dbh));
        }
    }

    /// Age, grow and thin every cohort by one year, charging for the dead.
    ///
    /// Trees dying at or past the warranty age are removed and replanted at
    /// cost. Younger losses follow `young_charge`. Replanting is a cost only;
    /// it never restores the cohort count. Depleted cohorts are dropped.
    pub fn step(
        &mut self,
        site: &SiteConfig,
        young_charge: YoungLossCharge,
        inflation: f64,
    ) -> Result<CohortStepOutcome, SimulationError> {
        let mut outcome = CohortStepOutcome::default();

        for cohort in &mut self.cohorts {
            let dead = cohort.grow_one_year(site.replacement_growth, |age| {
                site.cohort_mortality.rate_for_age(age)
            });
            outcome.deaths += dead;

            if cohort.age >= site.warranty_age {
                outcome.removal_cost += costs::removal(site, dead, cohort.dbh, inflation)?;
                outcome.replanting_cost += costs::planting(site, dead, inflation);
            } else if young_charge == YoungLossCharge::Replanting {
                outcome.replanting_cost += costs::planting(site, dead, inflation);
            }
        }

        self.cohorts.retain(|cohort| !cohort.is_depleted());
        Ok(outcome)
    }

    /// Living replacement trees across all cohorts.
    pub fn count(&self) -> u64 {
        self.cohorts.iter().map(|c| c.count).sum()
    }

    /// Count-weighted mean DBH, or `fallback` when no trees are alive.
    pub fn mean_dbh(&self, fallback: f64) -> f64 {
        let count = self.count();
        if count == 0 {
            return fallback;
        }
        let weighted: f64 = self.cohorts.iter().map(|c| c.dbh * c.count as f64).sum();
        weighted / count as f64
    }

    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Locale, MortalitySchedule};

    fn site_with_mortality(rates: Vec<f64>, background: f64) -> SiteConfig {
        let mut site = Locale::Generic.config();
        site.cohort_mortality = MortalitySchedule::new(rates, background);
        site
    }

    #[test]
    fn test_plant_skips_empty_batch() {
        let mut stand = ReplacementStand::new();
        stand.plant(0, 6.0);
        assert!(stand.is_empty());
        stand.plant(5, 6.0);
        assert_eq!(stand.cohorts.len(), 1);
        assert_eq!(stand.count(), 5);
    }

    #[test]
    fn test_young_losses_free() {
        let site = Locale::Generic.config();
        let mut stand = ReplacementStand::new();
        stand.plant(1000, site.planting_dbh);
        let out = stand.step(&site, YoungLossCharge::Free, 1.0).unwrap();
        assert_eq!(out.deaths, 85);
        assert_eq!(out.removal_cost, 0.0);
        assert_eq!(out.replanting_cost, 0.0);
        assert_eq!(stand.count(), 915);
    }

    #[test]
    fn test_young_losses_charged_replanting() {
        let site = Locale::Generic.config();
        let mut stand = ReplacementStand::new();
        stand.plant(1000, site.planting_dbh);
        let out = stand.step(&site, YoungLossCharge::Replanting, 1.0).unwrap();
        assert_eq!(out.removal_cost, 0.0);
        assert!((out.replanting_cost - 85.0 * 849.91).abs() < 1e-6);
        // replanting is cost-only
        assert_eq!(stand.count(), 915);
    }

    #[test]
    fn test_warranty_age_losses_charge_both() {
        let site = site_with_mortality(vec![0.0, 0.0, 0.1], 0.0);
        let mut stand = ReplacementStand::new();
        stand.plant(100, 6.0);
        stand.step(&site, YoungLossCharge::Free, 1.0).unwrap();
        stand.step(&site, YoungLossCharge::Free, 1.0).unwrap();
        let out = stand.step(&site, YoungLossCharge::Free, 1.0).unwrap();
        assert_eq!(stand.cohorts[0].age, 3);
        assert_eq!(out.deaths, 10);
        // dbh 6 + 3 * 0.47 = 7.41 falls in the first removal band
        assert!((out.removal_cost - 10.0 * 105.0).abs() < 1e-6);
        assert!((out.replanting_cost - 10.0 * 849.91).abs() < 1e-6);
    }

    #[test]
    fn test_costs_accumulate_across_cohorts() {
        let site = site_with_mortality(vec![], 0.5);
        let mut stand = ReplacementStand::new();
        stand.plant(10, 30.0);
        stand.plant(20, 50.0);
        let out = stand.step(&site, YoungLossCharge::Replanting, 1.0).unwrap();
        assert_eq!(out.deaths, 15);
        assert!((out.replanting_cost - 15.0 * 849.91).abs() < 1e-6);
    }

    #[test]
    fn test_depleted_cohorts_dropped() {
        let site = site_with_mortality(vec![1.0], 0.0);
        let mut stand = ReplacementStand::new();
        stand.plant(4, 6.0);
        stand.step(&site, YoungLossCharge::Free, 1.0).unwrap();
        assert!(stand.is_empty());
        assert_eq!(stand.mean_dbh(6.0), 6.0);
    }

    #[test]
    fn test_weighted_mean_dbh() {
        let mut stand = ReplacementStand::new();
        stand.plant(1, 10.0);
        stand.plant(3, 20.0);
        assert!((stand.mean_dbh(6.0) - 17.5).abs() < 1e-12);
    }
}
