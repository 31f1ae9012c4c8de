pub mod error;
pub mod io;
pub mod models;
pub mod simulation;
pub mod visualization;

pub use error::SimulationError;
pub use io::{RecordReader, RecordWriter};
pub use models::{Locale, Policy, PolicyKind, PolicyParams, SiteConfig, YearRecord};
pub use simulation::{simulate, Simulator};
