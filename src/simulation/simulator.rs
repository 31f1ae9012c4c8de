use serde::{Deserialize, Serialize};

use super::engine::simulate;
use super::sweep::{run_sweep, SweepResults};
use crate::error::SimulationError;
use crate::models::{Policy, PolicyKind, PolicyParams, SiteConfig, YearRecord};

/// Year-by-year outcome of one policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRun {
    pub policy: Policy,
    pub records: Vec<YearRecord>,
}

impl PolicyRun {
    /// Record for the last simulated year.
    pub fn final_record(&self) -> Option<&YearRecord> {
        self.records.last()
    }
}

/// Unified simulation API bound to one site configuration.
pub struct Simulator<'a> {
    site: &'a SiteConfig,
}

impl<'a> Simulator<'a> {
    /// Create a new Simulator for the given site.
    pub fn new(site: &'a SiteConfig) -> Self {
        Self { site }
    }

    /// Simulate a single policy.
    pub fn run(&self, policy: &Policy) -> Result<PolicyRun, SimulationError> {
        Ok(PolicyRun {
            policy: *policy,
            records: simulate(self.site, policy)?,
        })
    }

    /// Simulate every named policy with the shared parameters, in
    /// `PolicyKind::ALL` order.
    pub fn run_all(&self, params: &PolicyParams) -> Result<Vec<PolicyRun>, SimulationError> {
        PolicyKind::ALL
            .iter()
            .map(|kind| self.run(&kind.with_params(params)))
            .collect()
    }

    /// Simulate every policy in `policies` and keep the results for optimisation.
    pub fn sweep(&self, policies: &[Policy]) -> Result<SweepResults, SimulationError> {
        run_sweep(self.site, policies)
    }
}
