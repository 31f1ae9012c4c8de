use serde::{Deserialize, Serialize};

use super::costs;
use crate::error::SimulationError;
use crate::models::{deaths, InjectionBasis, Phase, SiteConfig};

/// The ash population, tracked as a count and a mean diameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyStand {
    pub count: u64,
    /// Mean DBH in cm; grows every year regardless of mortality
    pub dbh: f64,
}

/// Result of one year of ash management.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LegacyOutcome {
    /// Trees that died or were removed this year
    pub lost: u64,
    pub removal_cost: f64,
    pub injection_cost: f64,
}

impl LegacyStand {
    pub fn new(count: u64, dbh: f64) -> Self {
        Self { count, dbh }
    }

    pub fn from_site(site: &SiteConfig) -> Self {
        Self::new(site.legacy_count, site.legacy_dbh)
    }

    /// Grow the stand one year and apply exactly one phase action.
    ///
    /// Every lost tree is removed at the current mean diameter.
    pub fn step(
        &mut self,
        phase: Phase,
        basis: InjectionBasis,
        site: &SiteConfig,
        inflation: f64,
    ) -> Result<LegacyOutcome, SimulationError> {
        self.dbh += site.legacy_growth;

        let mut injection_cost = 0.0;
        let lost = match phase {
            Phase::Untreated => {
                let dead = deaths(self.count, site.untreated_mortality);
                self.count -= dead;
                dead
            }
            Phase::Injection => {
                let before = self.count;
                let dead = deaths(self.count, site.treated_mortality);
                self.count -= dead;
                let injected = match basis {
                    InjectionBasis::PreMortality => before,
                    InjectionBasis::PostMortality => self.count,
                };
                injection_cost = costs::injection(site, injected, self.dbh, inflation);
                dead
            }
            Phase::Removal { quota } => {
                let removed = quota.min(self.count);
                self.count -= removed;
                removed
            }
        };

        Ok(LegacyOutcome {
            lost,
            removal_cost: costs::removal(site, lost, self.dbh, inflation)?,
            injection_cost,
        })
    }
}
