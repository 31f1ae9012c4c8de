use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Annual mortality of replacement cohorts by age since planting.
///
/// Explicit rates cover the establishment years (ages 1-4 in every observed
/// site); any later age falls back to the all-species background rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortalitySchedule {
    /// Explicit rates; element `i` is the rate at age `i + 1`
    pub establishment_rates: Vec<f64>,
    /// Background rate for ages without an explicit entry
    pub background_rate: f64,
}

impl MortalitySchedule {
    /// Build a schedule whose explicit rates start at age 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use ash_canopy_sim::models::MortalitySchedule;
    ///
    /// let schedule = MortalitySchedule::new(vec![0.085, 0.117, 0.042, 0.061], 0.0085);
    /// assert_eq!(schedule.rate_for_age(2), 0.117);
    /// assert_eq!(schedule.rate_for_age(5), 0.0085);
    /// ```
    pub fn new(establishment_rates: Vec<f64>, background_rate: f64) -> Self {
        Self {
            establishment_rates,
            background_rate,
        }
    }

    /// Schedule with the same rate at every age.
    pub fn uniform(rate: f64) -> Self {
        Self::new(Vec::new(), rate)
    }

    /// Mortality rate for a cohort that has just reached `age`.
    pub fn rate_for_age(&self, age: u32) -> f64 {
        (age as usize)
            .checked_sub(1)
            .and_then(|i| self.establishment_rates.get(i))
            .copied()
            .unwrap_or(self.background_rate)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        let rates = self
            .establishment_rates
            .iter()
            .enumerate()
            .map(|(i, rate)| (format!("age {}", i + 1), *rate))
            .chain(std::iter::once(("background".to_string(), self.background_rate)));

        for (label, rate) in rates {
            if !(0.0..=1.0).contains(&rate) {
                return Err(SimulationError::ValidationError(format!(
                    "cohort mortality rate for {label} must be in 0.0..=1.0, got {rate}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MortalitySchedule {
        MortalitySchedule::new(vec![0.104, 0.145, 0.082, 0.101], 0.0085)
    }

    #[test]
    fn test_explicit_rates() {
        let s = sample();
        assert_eq!(s.rate_for_age(1), 0.104);
        assert_eq!(s.rate_for_age(2), 0.145);
        assert_eq!(s.rate_for_age(3), 0.082);
        assert_eq!(s.rate_for_age(4), 0.101);
    }

    #[test]
    fn test_background_fallback() {
        let s = sample();
        assert_eq!(s.rate_for_age(5), 0.0085);
        assert_eq!(s.rate_for_age(40), 0.0085);
        assert_eq!(s.rate_for_age(0), 0.0085);
    }

    #[test]
    fn test_uniform_schedule() {
        let s = MortalitySchedule::uniform(0.0);
        for age in 1..=20 {
            assert_eq!(s.rate_for_age(age), 0.0);
        }
    }

    #[test]
    fn test_validate_rate_range() {
        assert!(sample().validate().is_ok());
        assert!(MortalitySchedule::uniform(1.5).validate().is_err());
        assert!(MortalitySchedule::new(vec![-0.1], 0.01).validate().is_err());
        assert!(MortalitySchedule::new(vec![f64::NAN], 0.01).validate().is_err());
    }

    #[test]
    fn test_schedule_toml_roundtrip() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            mortality: MortalitySchedule,
        }
        let text = toml::to_string(&Wrapper { mortality: sample() }).unwrap();
        let back: Wrapper = toml::from_str(&text).unwrap();
        assert_eq!(back.mortality, sample());
    }
}
