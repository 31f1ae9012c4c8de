mod cohort;
mod cost_table;
mod mortality;
mod policy;
mod record;
mod site;

pub use cohort::{basal_area, deaths, Cohort};
pub use cost_table::{CostBand, CostTable};
pub use mortality::MortalitySchedule;
pub use policy::{
    CohortTiming, InjectionBasis, Phase, PlantingSchedule, Policy, PolicyKind, PolicyParams,
    PolicyRules, YoungLossCharge,
};
pub use record::{ClassSnapshot, CostBreakdown, YearRecord};
pub use site::{Depreciation, Locale, SiteConfig};
