use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use super::Phase;
use crate::error::SimulationError;

/// Management spending split by activity, in inflated dollars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub planting: f64,
    pub pruning: f64,
    pub injection: f64,
    pub removal: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.planting + self.pruning + self.injection + self.removal
    }
}

impl AddAssign for CostBreakdown {
    fn add_assign(&mut self, other: Self) {
        self.planting += other.planting;
        self.pruning += other.pruning;
        self.injection += other.injection;
        self.removal += other.removal;
    }
}

/// State of one species class at the end of a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSnapshot {
    /// Living trees
    pub count: u64,
    /// Mean DBH in cm
    pub mean_dbh: f64,
    /// Aggregate basal area in cm², derived from `mean_dbh` and `count`
    pub basal_area: f64,
    /// CTLA appraised value in inflated dollars
    pub value: f64,
}

/// One simulated year of a policy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// 1-based simulation year
    pub year: u32,
    /// Ash phase applied this year
    pub phase: Phase,
    /// Cost escalator for this year, 1.0 in year 1
    pub inflation_factor: f64,
    /// Ash population
    pub legacy: ClassSnapshot,
    /// All replacement cohorts combined
    pub replacement: ClassSnapshot,
    pub total_count: u64,
    pub total_basal_area: f64,
    /// Spending incurred this year
    pub annual_cost: CostBreakdown,
    /// Spending to date, including this year
    pub cumulative_cost: CostBreakdown,
    pub total_value: f64,
    /// Total appraised value minus cumulative spending
    pub net_value: f64,
}

impl YearRecord {
    /// Build a record, deriving the totals and net value.
    ///
    /// Fails with `ValidationError` when the combined count does not fit in a `u64`.
    pub fn new(
        year: u32,
        phase: Phase,
        inflation_factor: f64,
        legacy: ClassSnapshot,
        replacement: ClassSnapshot,
        annual_cost: CostBreakdown,
        cumulative_cost: CostBreakdown,
    ) -> Result<Self, SimulationError> {
        let total_count = legacy.count.checked_add(replacement.count).ok_or_else(|| {
            SimulationError::ValidationError(format!(
                "year {year}: total count overflows ({} ash + {} replacements)",
                legacy.count, replacement.count
            ))
        })?;
        let total_value = legacy.value + replacement.value;
        Ok(Self {
            year,
            phase,
            inflation_factor,
            total_count,
            total_basal_area: legacy.basal_area + replacement.basal_area,
            net_value: total_value - cumulative_cost.total(),
            total_value,
            legacy,
            replacement,
            annual_cost,
            cumulative_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(count: u64, basal_area: f64, value: f64) -> ClassSnapshot {
        ClassSnapshot {
            count,
            mean_dbh: 10.0,
            basal_area,
            value,
        }
    }

    #[test]
    fn test_cost_total() {
        let c = CostBreakdown {
            planting: 1.0,
            pruning: 2.0,
            injection: 3.0,
            removal: 4.0,
        };
        assert_eq!(c.total(), 10.0);
        assert_eq!(CostBreakdown::default().total(), 0.0);
    }

    #[test]
    fn test_cost_add_assign() {
        let mut running = CostBreakdown::default();
        let year = CostBreakdown {
            planting: 5.0,
            pruning: 1.0,
            injection: 0.0,
            removal: 2.5,
        };
        running += year;
        running += year;
        assert_eq!(running.planting, 10.0);
        assert_eq!(running.removal, 5.0);
        assert_eq!(running.total(), 17.0);
    }

    #[test]
    fn test_year_record_totals() {
        let cumulative = CostBreakdown {
            planting: 100.0,
            pruning: 0.0,
            injection: 0.0,
            removal: 50.0,
        };
        let record = YearRecord::new(
            3,
            Phase::Untreated,
            1.0404,
            snapshot(10, 2.0, 300.0),
            snapshot(5, 1.0, 200.0),
            CostBreakdown::default(),
            cumulative,
        )
        .unwrap();
        assert_eq!(record.total_count, 15);
        assert_eq!(record.total_basal_area, 3.0);
        assert_eq!(record.total_value, 500.0);
        assert_eq!(record.net_value, 350.0);
    }

    #[test]
    fn test_year_record_json_roundtrip() {
        let record = YearRecord::new(
            1,
            Phase::Removal { quota: 400 },
            1.0,
            snapshot(1, 1.0, 1.0),
            snapshot(2, 2.0, 2.0),
            CostBreakdown::default(),
            CostBreakdown::default(),
        )
        .unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let back: YearRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_year_record_count_overflow() {
        let result = YearRecord::new(
            1,
            Phase::Untreated,
            1.0,
            snapshot(u64::MAX, 1.0, 1.0),
            snapshot(1, 1.0, 1.0),
            CostBreakdown::default(),
            CostBreakdown::default(),
        );
        assert!(matches!(result, Err(SimulationError::ValidationError(_))));
    }
}
