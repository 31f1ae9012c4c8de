use serde::{Deserialize, Serialize};

/// A batch of replacement trees planted in the same year.
///
/// Cohorts are never merged; a cohort is dropped once its count reaches zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cohort {
    /// Years since planting
    pub age: u32,
    /// Living trees in the cohort
    pub count: u64,
    /// Mean DBH in cm
    pub dbh: f64,
}

impl Cohort {
    /// A freshly planted cohort (age 0).
    pub fn planted(count: u64, dbh: f64) -> Self {
        Self { age: 0, count, dbh }
    }

    /// Advance one year: age and diameter grow, then deaths are drawn at the
    /// rate for the new age. Returns the number of trees that died.
    ///
    /// The draw is floored, so a cohort can never lose more trees than it has.
    pub fn grow_one_year(&mut self, dbh_increment: f64, mortality_for_age: impl Fn(u32) -> f64) -> u64 {
        self.age += 1;
        self.dbh += dbh_increment;
        let dead = deaths(self.count, mortality_for_age(self.age));
        self.count -= dead;
        dead
    }

    pub fn is_depleted(&self) -> bool {
        self.count == 0
    }
}

/// Aggregate basal area (cm²) of `count` trees of mean diameter `dbh`:
/// `π × (dbh / 2)² × count`.
pub fn basal_area(dbh: f64, count: u64) -> f64 {
    std::f64::consts::PI * (dbh / 2.0).powi(2) * count as f64
}

/// Floored number of deaths among `count` trees at `rate`, capped at `count`.
pub fn deaths(count: u64, rate: f64) -> u64 {
    let drawn = (count as f64 * rate).floor();
    if drawn <= 0.0 {
        0
    } else {
        (drawn as u64).min(count)
    }
}
