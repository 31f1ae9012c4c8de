mod costs;
mod engine;
mod legacy;
mod replacement;
mod simulator;
mod sweep;
mod valuation;

pub use engine::simulate;
pub use legacy::{LegacyOutcome, LegacyStand};
pub use replacement::{CohortStepOutcome, ReplacementStand};
pub use simulator::{PolicyRun, Simulator};
pub use sweep::{run_sweep, Metric, Optimum, PolicyGrid, SweepResults};
pub use valuation::{appraised_value, snapshot};
