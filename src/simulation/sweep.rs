use serde::{Deserialize, Serialize};
use tracing::debug;

use super::engine::simulate;
use super::simulator::PolicyRun;
use crate::error::SimulationError;
use crate::models::{Policy, PolicyKind, SiteConfig, YearRecord};

/// Final-year outcome a sweep can optimise for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalCount,
    TotalBasalArea,
    CumulativeCost,
    TotalValue,
    NetValue,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::TotalCount,
        Metric::TotalBasalArea,
        Metric::CumulativeCost,
        Metric::TotalValue,
        Metric::NetValue,
    ];

    /// Read this metric from a year record.
    pub fn value(self, record: &YearRecord) -> f64 {
        match self {
            Metric::TotalCount => record.total_count as f64,
            Metric::TotalBasalArea => record.total_basal_area,
            Metric::CumulativeCost => record.cumulative_cost.total(),
            Metric::TotalValue => record.total_value,
            Metric::NetValue => record.net_value,
        }
    }

    /// Spending is minimised; everything else is maximised.
    pub fn minimize(self) -> bool {
        self == Metric::CumulativeCost
    }

    fn improves(self, candidate: f64, best: f64) -> bool {
        if self.minimize() {
            candidate < best
        } else {
            candidate > best
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::TotalCount => write!(f, "Total Tree Count"),
            Metric::TotalBasalArea => write!(f, "Total Basal Area"),
            Metric::CumulativeCost => write!(f, "Cumulative Total Cost"),
            Metric::TotalValue => write!(f, "Total CTLA Value"),
            Metric::NetValue => write!(f, "Net Value"),
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "count" | "total-count" => Ok(Metric::TotalCount),
            "basal-area" | "ba" | "total-basal-area" => Ok(Metric::TotalBasalArea),
            "cost" | "cumulative-cost" => Ok(Metric::CumulativeCost),
            "value" | "total-value" => Ok(Metric::TotalValue),
            "net" | "net-value" => Ok(Metric::NetValue),
            _ => Err(SimulationError::ParseError(format!("Unknown metric: '{s}'"))),
        }
    }
}

/// Parameter values to combine when sweeping a policy kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyGrid {
    pub removal_rates: Vec<u64>,
    pub injection_years: Vec<u32>,
    pub removal_years: Vec<u32>,
    pub planting_rates: Vec<u64>,
    pub planting_years: Vec<u32>,
}

impl Default for PolicyGrid {
    fn default() -> Self {
        Self {
            removal_rates: vec![100, 250, 500, 1000],
            injection_years: (1..=20).collect(),
            removal_years: (1..=20).collect(),
            planting_rates: vec![10, 332, 333, 334, 400, 1000],
            planting_years: (1..=20).collect(),
        }
    }
}

impl PolicyGrid {
    /// Every parameter combination for `kind`. Kinds without parameters
    /// yield a single policy.
    ///
    /// Replant-inject-remove combinations only appear when removal starts
    /// after planting.
    pub fn policies(&self, kind: PolicyKind) -> Vec<Policy> {
        match kind {
            PolicyKind::RemoveThenReplant => self
                .removal_rates
                .iter()
                .map(|&removal_rate| Policy::RemoveThenReplant { removal_rate })
                .collect(),
            PolicyKind::InjectRemoveReplant => self
                .removal_rates
                .iter()
                .flat_map(|&removal_rate| {
                    self.injection_years
                        .iter()
                        .map(move |&injection_years| Policy::InjectRemoveReplant {
                            injection_years,
                            removal_rate,
                        })
                })
                .collect(),
            PolicyKind::ReplantInjectThenRemove => {
                let mut policies = Vec::new();
                for &removal_rate in &self.removal_rates {
                    for &removal_year in &self.removal_years {
                        for &planting_rate in &self.planting_rates {
                            for &planting_year in &self.planting_years {
                                if removal_year > planting_year {
                                    policies.push(Policy::ReplantInjectThenRemove {
                                        removal_year,
                                        removal_rate,
                                        planting_rate,
                                        planting_year,
                                    });
                                }
                            }
                        }
                    }
                }
                policies
            }
            PolicyKind::ControlAndRemove => vec![Policy::ControlAndRemove],
            PolicyKind::ControlRemoveReplant => vec![Policy::ControlRemoveReplant],
            PolicyKind::InjectInPerpetuity => vec![Policy::InjectInPerpetuity],
            PolicyKind::InjectInPerpetuityReplant => vec![Policy::InjectInPerpetuityReplant],
        }
    }
}

/// The best policy found for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Optimum {
    pub metric: Metric,
    pub policy: Policy,
    /// Metric value at `year`
    pub value: f64,
    pub year: u32,
}

/// Results of a sweep, in the order the policies were supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepResults {
    pub runs: Vec<PolicyRun>,
}

impl SweepResults {
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Records for `policy`, if it was part of the sweep.
    pub fn get(&self, policy: &Policy) -> Option<&[YearRecord]> {
        self.runs
            .iter()
            .find(|run| run.policy == *policy)
            .map(|run| run.records.as_slice())
    }

    /// Best final-year value of `metric`. Ties keep the earliest policy.
    pub fn best(&self, metric: Metric) -> Option<Optimum> {
        let mut best: Option<Optimum> = None;
        for run in &self.runs {
            let Some(last) = run.final_record() else {
                continue;
            };
            let value = metric.value(last);
            let better = match &best {
                None => true,
                Some(current) => metric.improves(value, current.value),
            };
            if better {
                best = Some(Optimum {
                    metric,
                    policy: run.policy,
                    value,
                    year: last.year,
                });
            }
        }
        best
    }

    /// Best policy for every metric.
    pub fn optima(&self) -> Vec<Optimum> {
        Metric::ALL
            .iter()
            .filter_map(|&metric| self.best(metric))
            .collect()
    }
}

/// Simulate each policy in turn. Any failing run aborts the sweep.
pub fn run_sweep(site: &SiteConfig, policies: &[Policy]) -> Result<SweepResults, SimulationError> {
    let mut runs = Vec::with_capacity(policies.len());
    for policy in policies {
        debug!(policy = %policy, "sweep combination");
        runs.push(PolicyRun {
            policy: *policy,
            records: simulate(site, policy)?,
        });
    }
    Ok(SweepResults { runs })
}
