use serde::{Deserialize, Serialize};

use super::{CostBand, CostTable, MortalitySchedule};
use crate::error::SimulationError;

/// CTLA depreciation sub-ratios for one species class, each in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depreciation {
    pub condition: f64,
    pub functional_limitation: f64,
    pub external_limitation: f64,
}

impl Depreciation {
    pub fn new(condition: f64, functional_limitation: f64, external_limitation: f64) -> Self {
        Self {
            condition,
            functional_limitation,
            external_limitation,
        }
    }

    /// No depreciation at all.
    pub fn none() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Combined depreciation factor applied to the appraised value.
    pub fn factor(&self) -> f64 {
        self.condition * self.functional_limitation * self.external_limitation
    }

    fn validate(&self, class: &str) -> Result<(), SimulationError> {
        let ratios = [
            ("condition", self.condition),
            ("functional_limitation", self.functional_limitation),
            ("external_limitation", self.external_limitation),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimulationError::ValidationError(format!(
                    "{class} depreciation {name} must be in 0.0..=1.0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

fn default_pruning_cycle_years() -> u32 {
    7
}

fn default_injection_cycle_years() -> u32 {
    2
}

/// Immutable per-site configuration for one simulation run.
///
/// Diameters are DBH in centimetres; costs are dollars in year-1 terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site label used in reports
    pub name: String,
    /// Number of simulated years
    pub horizon_years: u32,

    /// Starting number of ash trees
    pub legacy_count: u64,
    /// Starting mean ash DBH
    pub legacy_dbh: f64,
    /// Annual ash DBH increment
    pub legacy_growth: f64,
    /// Annual ash mortality without treatment
    pub untreated_mortality: f64,
    /// Annual ash mortality while injected
    pub treated_mortality: f64,

    /// DBH of a newly planted replacement tree
    pub planting_dbh: f64,
    /// Annual replacement DBH increment
    pub replacement_growth: f64,
    /// Replacement cohort mortality by age
    pub cohort_mortality: MortalitySchedule,
    /// Cohort age from which dead replacements incur removal and replanting cost
    pub warranty_age: u32,

    /// Cost to plant and establish one replacement tree
    pub planting_cost: f64,
    /// Injection cost per cm of DBH
    pub injection_cost_per_cm: f64,
    /// Removal cost by DBH band
    pub removal_costs: CostTable,
    /// Pruning cost by DBH band
    pub pruning_costs: CostTable,
    /// Years between prunings of any one tree
    #[serde(default = "default_pruning_cycle_years")]
    pub pruning_cycle_years: u32,
    /// Years between injections of any one tree
    #[serde(default = "default_injection_cycle_years")]
    pub injection_cycle_years: u32,

    /// Annual cost escalation (0.02 = 2%)
    pub inflation_rate: f64,

    pub legacy_depreciation: Depreciation,
    pub replacement_depreciation: Depreciation,
}

impl SiteConfig {
    /// Longest horizon a run may cover.
    pub const MAX_HORIZON_YEARS: u32 = 1_000;
    /// Largest starting ash population. Replacements never exceed the
    /// starting population, so stand totals stay far inside `u64`.
    pub const MAX_LEGACY_COUNT: u64 = 1_000_000_000;

    /// Validate every parameter. Returns `SimulationError::ValidationError` on failure.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let invalid = |msg: String| Err(SimulationError::ValidationError(msg));

        if self.horizon_years == 0 {
            return invalid("horizon_years must be at least 1".to_string());
        }
        if self.horizon_years > Self::MAX_HORIZON_YEARS {
            return invalid(format!(
                "horizon_years must be at most {}, got {}",
                Self::MAX_HORIZON_YEARS,
                self.horizon_years
            ));
        }
        if self.legacy_count > Self::MAX_LEGACY_COUNT {
            return invalid(format!(
                "legacy_count must be at most {}, got {}",
                Self::MAX_LEGACY_COUNT,
                self.legacy_count
            ));
        }

        let non_negative = [
            ("legacy_growth", self.legacy_growth),
            ("replacement_growth", self.replacement_growth),
            ("planting_cost", self.planting_cost),
            ("injection_cost_per_cm", self.injection_cost_per_cm),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        let positive = [
            ("legacy_dbh", self.legacy_dbh),
            ("planting_dbh", self.planting_dbh),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return invalid(format!("{name} must be positive, got {value}"));
            }
        }

        let rates = [
            ("untreated_mortality", self.untreated_mortality),
            ("treated_mortality", self.treated_mortality),
        ];
        for (name, value) in rates {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{name} must be in 0.0..=1.0, got {value}"));
            }
        }
        if !self.inflation_rate.is_finite() || self.inflation_rate <= -1.0 {
            return invalid(format!(
                "inflation_rate must be greater than -1.0, got {}",
                self.inflation_rate
            ));
        }
        if self.pruning_cycle_years == 0 || self.injection_cycle_years == 0 {
            return invalid("pruning and injection cycles must be at least 1 year".to_string());
        }

        self.cohort_mortality.validate()?;
        self.removal_costs.validate()?;
        self.pruning_costs.validate()?;
        self.legacy_depreciation.validate("legacy")?;
        self.replacement_depreciation.validate("replacement")?;
        Ok(())
    }

    /// Appraised value per cm² of basal area in year-1 dollars.
    ///
    /// A newly planted tree is worth its planting cost, so the unit price is
    /// the planting cost divided by the new tree's squared radius.
    pub fn unit_value_per_area(&self) -> f64 {
        self.planting_cost / (self.planting_dbh / 2.0).powi(2)
    }
}

/// Municipal sites with calibrated parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Generic,
    Park,
    Street,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::Generic, Locale::Park, Locale::Street];

    /// Full configuration for this site.
    pub fn config(self) -> SiteConfig {
        let (legacy_count, legacy_dbh, legacy_growth) = match self {
            Locale::Generic => (1490, 27.18, 0.30),
            Locale::Park => (356, 14.60, 0.48),
            Locale::Street => (1134, 31.12, 0.2875),
        };
        let establishment = match self {
            Locale::Generic => vec![0.085, 0.117, 0.042, 0.061],
            Locale::Park => vec![0.104, 0.145, 0.082, 0.101],
            Locale::Street => vec![0.069, 0.107, 0.042, 0.061],
        };
        let removal = match self {
            Locale::Generic => [105.0, 305.0, 855.0, 1450.0, 2950.0, 2950.0, 5700.0],
            Locale::Park => [110.0, 290.0, 788.0, 1265.0, 2915.0, 3240.0, 4650.0],
            Locale::Street => [275.0, 505.0, 1150.0, 1670.0, 3425.0, 4035.0, 5590.0],
        };
        let (legacy_depreciation, replacement_depreciation) = match self {
            Locale::Generic => (
                Depreciation::new(0.50, 0.10, 0.80),
                Depreciation::new(0.75, 0.70, 0.90),
            ),
            Locale::Park => (
                Depreciation::new(0.50, 0.15, 0.80),
                Depreciation::new(0.75, 0.95, 0.90),
            ),
            Locale::Street => (
                Depreciation::new(0.50, 0.05, 0.80),
                Depreciation::new(0.75, 0.60, 0.90),
            ),
        };

        SiteConfig {
            name: self.to_string(),
            horizon_years: 20,
            legacy_count,
            legacy_dbh,
            legacy_growth,
            untreated_mortality: 0.20,
            treated_mortality: 0.028,
            planting_dbh: 6.0,
            replacement_growth: 0.47,
            cohort_mortality: MortalitySchedule::new(establishment, 0.0085),
            warranty_age: 3,
            planting_cost: 849.91,
            injection_cost_per_cm: 3.325,
            removal_costs: standard_bands("removal", &removal),
            pruning_costs: standard_bands(
                "pruning",
                &[60.0, 118.0, 268.0, 460.0, 610.0, 710.0, 862.0],
            ),
            pruning_cycle_years: default_pruning_cycle_years(),
            injection_cycle_years: default_injection_cycle_years(),
            inflation_rate: 0.02,
            legacy_depreciation,
            replacement_depreciation,
        }
    }
}

/// The 20 cm banding shared by every municipal cost schedule.
fn standard_bands(name: &str, costs: &[f64; 7]) -> CostTable {
    const EDGES: [f64; 6] = [20.0, 40.0, 60.0, 80.0, 100.0, 120.0];
    let mut lower = 0.0;
    let bands = costs
        .iter()
        .enumerate()
        .map(|(i, &cost)| {
            let upper = EDGES.get(i).copied();
            let band = CostBand::new(lower, upper, cost);
            lower = upper.unwrap_or(lower);
            band
        })
        .collect();
    CostTable::new(name, bands)
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::Generic => write!(f, "generic"),
            Locale::Park => write!(f, "park"),
            Locale::Street => write!(f, "street"),
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generic" | "g" => Ok(Locale::Generic),
            "park" | "p" => Ok(Locale::Park),
            "street" | "s" => Ok(Locale::Street),
            _ => Err(SimulationError::ParseError(format!("Unknown site: '{s}'"))),
        }
    }
}
