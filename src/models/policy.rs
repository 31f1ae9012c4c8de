use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// What happens to the ash population in a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Untreated: pest mortality at the untreated rate
    Untreated,
    /// Injected: mortality at the treated rate, injection cost charged
    Injection,
    /// Preemptive removal of up to `quota` trees, no mortality draw
    Removal { quota: u64 },
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Untreated => write!(f, "untreated"),
            Phase::Injection => write!(f, "injection"),
            Phase::Removal { quota } => write!(f, "removal ({quota}/yr)"),
        }
    }
}

impl std::str::FromStr for Phase {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "untreated" => return Ok(Phase::Untreated),
            "injection" => return Ok(Phase::Injection),
            _ => {}
        }
        s.strip_prefix("removal (")
            .and_then(|rest| rest.strip_suffix("/yr)"))
            .and_then(|quota| quota.trim().parse().ok())
            .map(|quota| Phase::Removal { quota })
            .ok_or_else(|| SimulationError::ParseError(format!("Unknown phase: '{s}'")))
    }
}

/// When replanted ash losses join the replacement stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CohortTiming {
    /// Planted before the year's cohort step, so the batch ages to 1 this year
    BeforeStep,
    /// Planted after the cohort step; the batch first ages next year
    AfterStep,
}

/// Which ash count the injection cost is charged on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionBasis {
    PreMortality,
    PostMortality,
}

/// Cost of replacement trees that die before the warranty age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YoungLossCharge {
    /// The nursery replaces them at no charge
    Free,
    /// Replanting cost is charged, but no removal cost
    Replanting,
}

/// Fixed behaviour constants of a named policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyRules {
    /// Dead or removed ash become a new replacement cohort
    pub replant_losses: bool,
    pub cohort_timing: CohortTiming,
    pub injection_basis: InjectionBasis,
    /// Ash trees are included in the pruning cycle
    pub prune_legacy: bool,
    pub young_loss_charge: YoungLossCharge,
}

/// Planting independent of ash losses: a fixed batch each year from a start year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlantingSchedule {
    pub rate: u64,
    pub start_year: u32,
    /// Batches are only charged from this year on
    pub charged_from_year: u32,
}

impl PlantingSchedule {
    /// Trees planted this year: the rate, capped so the replacement stand does
    /// not exceed the original ash population.
    pub fn batch(&self, year: u32, target: u64, replacement_count: u64) -> u64 {
        if year < self.start_year {
            return 0;
        }
        self.rate.min(target.saturating_sub(replacement_count))
    }

    pub fn is_charged(&self, year: u32) -> bool {
        year >= self.charged_from_year
    }
}

/// Parameters shared by the policy variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyParams {
    /// Ash trees removed per year during a removal phase
    pub removal_rate: u64,
    /// Last injection year before removal starts (replant-inject-remove)
    pub removal_year: u32,
    /// Number of injection years before removal starts (inject-remove-replant)
    pub injection_years: u32,
    /// Replacement trees planted per year (replant-inject-remove)
    pub planting_rate: u64,
    /// First planting year (replant-inject-remove)
    pub planting_year: u32,
}

impl Default for PolicyParams {
    fn default() -> Self {
        Self {
            removal_rate: 400,
            removal_year: 5,
            injection_years: 5,
            planting_rate: 400,
            planting_year: 1,
        }
    }
}

/// The named management strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    ControlAndRemove,
    ControlRemoveReplant,
    RemoveThenReplant,
    ReplantInjectThenRemove,
    InjectRemoveReplant,
    InjectInPerpetuity,
    InjectInPerpetuityReplant,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 7] = [
        PolicyKind::ControlAndRemove,
        PolicyKind::ControlRemoveReplant,
        PolicyKind::RemoveThenReplant,
        PolicyKind::ReplantInjectThenRemove,
        PolicyKind::InjectRemoveReplant,
        PolicyKind::InjectInPerpetuity,
        PolicyKind::InjectInPerpetuityReplant,
    ];

    /// Short command-line name.
    pub fn slug(self) -> &'static str {
        match self {
            PolicyKind::ControlAndRemove => "control-remove",
            PolicyKind::ControlRemoveReplant => "control-remove-replant",
            PolicyKind::RemoveThenReplant => "remove-replant",
            PolicyKind::ReplantInjectThenRemove => "replant-inject-remove",
            PolicyKind::InjectRemoveReplant => "inject-remove-replant",
            PolicyKind::InjectInPerpetuity => "inject-perpetuity",
            PolicyKind::InjectInPerpetuityReplant => "inject-perpetuity-replant",
        }
    }

    /// Instantiate the policy, taking whichever parameters it uses.
    pub fn with_params(self, params: &PolicyParams) -> Policy {
        match self {
            PolicyKind::ControlAndRemove => Policy::ControlAndRemove,
            PolicyKind::ControlRemoveReplant => Policy::ControlRemoveReplant,
            PolicyKind::RemoveThenReplant => Policy::RemoveThenReplant {
                removal_rate: params.removal_rate,
            },
            PolicyKind::ReplantInjectThenRemove => Policy::ReplantInjectThenRemove {
                removal_year: params.removal_year,
                removal_rate: params.removal_rate,
                planting_rate: params.planting_rate,
                planting_year: params.planting_year,
            },
            PolicyKind::InjectRemoveReplant => Policy::InjectRemoveReplant {
                injection_years: params.injection_years,
                removal_rate: params.removal_rate,
            },
            PolicyKind::InjectInPerpetuity => Policy::InjectInPerpetuity,
            PolicyKind::InjectInPerpetuityReplant => Policy::InjectInPerpetuityReplant,
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PolicyKind::ControlAndRemove => "Control and Remove",
            PolicyKind::ControlRemoveReplant => "Control, Remove, then Replant",
            PolicyKind::RemoveThenReplant => "Remove then Replant",
            PolicyKind::ReplantInjectThenRemove => "Replant, Inject, then Remove",
            PolicyKind::InjectRemoveReplant => "Inject, Remove, and Replant",
            PolicyKind::InjectInPerpetuity => "Inject in Perpetuity",
            PolicyKind::InjectInPerpetuityReplant => "Inject in Perpetuity with Replanting",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for PolicyKind {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        PolicyKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == normalized)
            .ok_or_else(|| SimulationError::ParseError(format!("Unknown policy: '{s}'")))
    }
}

/// A management strategy with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Policy {
    /// Leave ash untreated; remove trees as they die
    ControlAndRemove,
    /// Leave ash untreated; remove dead trees and replant them
    ControlRemoveReplant,
    /// Remove ash preemptively at a fixed rate and replant them
    RemoveThenReplant { removal_rate: u64 },
    /// Plant on a fixed schedule, inject ash until `removal_year`, then remove
    ReplantInjectThenRemove {
        removal_year: u32,
        removal_rate: u64,
        planting_rate: u64,
        planting_year: u32,
    },
    /// Inject for `injection_years`, then remove; replant every lost ash
    InjectRemoveReplant {
        injection_years: u32,
        removal_rate: u64,
    },
    /// Inject every year, remove trees as they die
    InjectInPerpetuity,
    /// Inject every year, remove and replant trees as they die
    InjectInPerpetuityReplant,
}

impl Policy {
    pub fn kind(&self) -> PolicyKind {
        match self {
            Policy::ControlAndRemove => PolicyKind::ControlAndRemove,
            Policy::ControlRemoveReplant => PolicyKind::ControlRemoveReplant,
            Policy::RemoveThenReplant { .. } => PolicyKind::RemoveThenReplant,
            Policy::ReplantInjectThenRemove { .. } => PolicyKind::ReplantInjectThenRemove,
            Policy::InjectRemoveReplant { .. } => PolicyKind::InjectRemoveReplant,
            Policy::InjectInPerpetuity => PolicyKind::InjectInPerpetuity,
            Policy::InjectInPerpetuityReplant => PolicyKind::InjectInPerpetuityReplant,
        }
    }

    /// Phase of the ash population in `year` (1-based).
    pub fn phase(&self, year: u32) -> Phase {
        match *self {
            Policy::ControlAndRemove | Policy::ControlRemoveReplant => Phase::Untreated,
            Policy::RemoveThenReplant { removal_rate } => Phase::Removal {
                quota: removal_rate,
            },
            Policy::ReplantInjectThenRemove {
                removal_year,
                removal_rate,
                ..
            } => {
                if year <= removal_year {
                    Phase::Injection
                } else {
                    Phase::Removal {
                        quota: removal_rate,
                    }
                }
            }
            Policy::InjectRemoveReplant {
                injection_years,
                removal_rate,
            } => {
                if year <= injection_years {
                    Phase::Injection
                } else {
                    Phase::Removal {
                        quota: removal_rate,
                    }
                }
            }
            Policy::InjectInPerpetuity | Policy::InjectInPerpetuityReplant => Phase::Injection,
        }
    }

    /// Fixed per-policy behaviour. The variants disagree on several details
    /// (cohort timing, pruning of ash, young-loss charges) and each keeps its own.
    pub fn rules(&self) -> PolicyRules {
        use CohortTiming::*;
        use InjectionBasis::*;
        use YoungLossCharge::*;

        let rules = |replant_losses: bool,
                     cohort_timing: CohortTiming,
                     injection_basis: InjectionBasis,
                     prune_legacy: bool,
                     young: YoungLossCharge| {
            PolicyRules {
                replant_losses,
                cohort_timing,
                injection_basis,
                prune_legacy,
                young_loss_charge: young,
            }
        };

        match self {
            Policy::ControlAndRemove => rules(false, BeforeStep, PreMortality, true, Free),
            Policy::ControlRemoveReplant => rules(true, AfterStep, PreMortality, false, Free),
            Policy::RemoveThenReplant { .. } => rules(true, BeforeStep, PreMortality, false, Free),
            Policy::ReplantInjectThenRemove { .. } => {
                rules(false, BeforeStep, PostMortality, true, Replanting)
            }
            Policy::InjectRemoveReplant { .. } => rules(true, BeforeStep, PreMortality, true, Free),
            Policy::InjectInPerpetuity => rules(false, BeforeStep, PreMortality, true, Free),
            Policy::InjectInPerpetuityReplant => rules(true, BeforeStep, PreMortality, true, Free),
        }
    }

    /// Independent planting schedule, if the policy has one.
    pub fn planting_schedule(&self) -> Option<PlantingSchedule> {
        match *self {
            Policy::ReplantInjectThenRemove {
                removal_year,
                planting_rate,
                planting_year,
                ..
            } => Some(PlantingSchedule {
                rate: planting_rate,
                start_year: planting_year,
                charged_from_year: removal_year,
            }),
            _ => None,
        }
    }

    /// Human-readable parameter list, e.g. `Removal Rate: 250, Injection Year: 5`.
    pub fn parameter_summary(&self) -> String {
        match self {
            Policy::RemoveThenReplant { removal_rate } => format!("Removal Rate: {removal_rate}"),
            Policy::ReplantInjectThenRemove {
                removal_year,
                removal_rate,
                planting_rate,
                planting_year,
            } => format!(
                "Removal Year: {removal_year}, Removal Rate: {removal_rate}, \
                 Planting Rate: {planting_rate}, Planting Year: {planting_year}"
            ),
            Policy::InjectRemoveReplant {
                injection_years,
                removal_rate,
            } => format!("Removal Rate: {removal_rate}, Injection Year: {injection_years}"),
            _ => String::new(),
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.parameter_summary();
        if params.is_empty() {
            write!(f, "{}", self.kind())
        } else {
            write!(f, "{} ({params})", self.kind())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_slugs() {
        for kind in PolicyKind::ALL {
            assert_eq!(kind.slug().parse::<PolicyKind>().unwrap(), kind);
        }
        assert_eq!(
            "INJECT_PERPETUITY".parse::<PolicyKind>().unwrap(),
            PolicyKind::InjectInPerpetuity
        );
        assert!("burn-it-down".parse::<PolicyKind>().is_err());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(
            PolicyKind::ControlRemoveReplant.to_string(),
            "Control, Remove, then Replant"
        );
        assert_eq!(
            PolicyKind::InjectInPerpetuityReplant.to_string(),
            "Inject in Perpetuity with Replanting"
        );
    }

    #[test]
    fn test_with_params_roundtrips_kind() {
        let params = PolicyParams::default();
        for kind in PolicyKind::ALL {
            assert_eq!(kind.with_params(&params).kind(), kind);
        }
    }

    #[test]
    fn test_inject_remove_phases() {
        let policy = Policy::InjectRemoveReplant {
            injection_years: 3,
            removal_rate: 100,
        };
        assert_eq!(policy.phase(1), Phase::Injection);
        assert_eq!(policy.phase(3), Phase::Injection);
        assert_eq!(policy.phase(4), Phase::Removal { quota: 100 });
    }

    #[test]
    fn test_phase_parse_roundtrip() {
        for phase in [Phase::Untreated, Phase::Injection, Phase::Removal { quota: 250 }] {
            assert_eq!(phase.to_string().parse::<Phase>().unwrap(), phase);
        }
        assert!("removal (lots/yr)".parse::<Phase>().is_err());
        assert!("dormant".parse::<Phase>().is_err());
    }

    #[test]
    fn test_constant_phases() {
        assert_eq!(Policy::ControlAndRemove.phase(7), Phase::Untreated);
        assert_eq!(Policy::InjectInPerpetuity.phase(20), Phase::Injection);
        assert_eq!(
            Policy::RemoveThenReplant { removal_rate: 9 }.phase(1),
            Phase::Removal { quota: 9 }
        );
    }

    #[test]
    fn test_rules_differ_where_variants_differ() {
        assert_eq!(
            Policy::ControlRemoveReplant.rules().cohort_timing,
            CohortTiming::AfterStep
        );
        assert!(!Policy::RemoveThenReplant { removal_rate: 1 }.rules().prune_legacy);
        let replant_inject = Policy::ReplantInjectThenRemove {
            removal_year: 5,
            removal_rate: 400,
            planting_rate: 400,
            planting_year: 1,
        };
        assert_eq!(
            replant_inject.rules().young_loss_charge,
            YoungLossCharge::Replanting
        );
        assert_eq!(
            replant_inject.rules().injection_basis,
            InjectionBasis::PostMortality
        );
        assert!(!replant_inject.rules().replant_losses);
        assert!(!Policy::InjectInPerpetuity.rules().replant_losses);
    }

    #[test]
    fn test_planting_schedule_batch() {
        let schedule = PlantingSchedule {
            rate: 400,
            start_year: 2,
            charged_from_year: 5,
        };
        assert_eq!(schedule.batch(1, 1490, 0), 0);
        assert_eq!(schedule.batch(2, 1490, 0), 400);
        assert_eq!(schedule.batch(4, 1490, 1200), 290);
        assert_eq!(schedule.batch(5, 1490, 1600), 0);
        assert!(!schedule.is_charged(4));
        assert!(schedule.is_charged(5));
    }

    #[test]
    fn test_only_replant_inject_has_schedule() {
        let params = PolicyParams::default();
        for kind in PolicyKind::ALL {
            let has = kind.with_params(&params).planting_schedule().is_some();
            assert_eq!(has, kind == PolicyKind::ReplantInjectThenRemove);
        }
    }

    #[test]
    fn test_policy_display() {
        let policy = Policy::InjectRemoveReplant {
            injection_years: 5,
            removal_rate: 250,
        };
        assert_eq!(
            policy.to_string(),
            "Inject, Remove, and Replant (Removal Rate: 250, Injection Year: 5)"
        );
        assert_eq!(Policy::InjectInPerpetuity.to_string(), "Inject in Perpetuity");
    }

    #[test]
    fn test_policy_json_shape() {
        insta::assert_json_snapshot!(Policy::RemoveThenReplant { removal_rate: 250 }, @r###"
        {
          "policy": "remove_then_replant",
          "removal_rate": 250
        }
        "###);
        insta::assert_json_snapshot!(Policy::ControlAndRemove, @r###"
        {
          "policy": "control_and_remove"
        }
        "###);
    }

    #[test]
    fn test_params_default_fill() {
        let params: PolicyParams = toml::from_str("removal_rate = 1000").unwrap();
        assert_eq!(params.removal_rate, 1000);
        assert_eq!(params.removal_year, 5);
        assert_eq!(params.planting_year, 1);
    }
}
