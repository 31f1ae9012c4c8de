use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// One diameter band of a cost table: covers `(min_dbh, max_dbh]`.
///
/// `max_dbh = None` marks the top band, which is unbounded above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBand {
    /// Lower bound in cm (exclusive)
    pub min_dbh: f64,
    /// Upper bound in cm (inclusive); `None` for the open-ended top band
    pub max_dbh: Option<f64>,
    /// Cost per tree in dollars
    pub unit_cost: f64,
}

impl CostBand {
    pub fn new(min_dbh: f64, max_dbh: Option<f64>, unit_cost: f64) -> Self {
        Self {
            min_dbh,
            max_dbh,
            unit_cost,
        }
    }

    /// Check whether a diameter lies in this band.
    pub fn contains(&self, dbh: f64) -> bool {
        dbh > self.min_dbh && self.max_dbh.map_or(true, |max| dbh <= max)
    }
}

/// Piecewise per-tree cost keyed by DBH (removal or pruning).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostTable {
    /// Table name used in error messages (e.g. "removal")
    pub name: String,
    /// Ordered, contiguous bands starting at 0 cm
    pub bands: Vec<CostBand>,
}

impl CostTable {
    pub fn new(name: impl Into<String>, bands: Vec<CostBand>) -> Self {
        Self {
            name: name.into(),
            bands,
        }
    }

    /// Build a table from band edges and per-band costs.
    ///
    /// `edges` are the finite upper bounds; one more cost than edges is
    /// required for the open-ended top band.
    ///
    /// # Examples
    ///
    /// ```
    /// use ash_canopy_sim::models::CostTable;
    ///
    /// let table = CostTable::from_edges("pruning", &[20.0, 40.0], &[60.0, 118.0, 268.0]).unwrap();
    /// assert_eq!(table.lookup(20.0).unwrap(), 60.0);
    /// assert_eq!(table.lookup(250.0).unwrap(), 268.0);
    /// ```
    pub fn from_edges(
        name: impl Into<String>,
        edges: &[f64],
        costs: &[f64],
    ) -> Result<Self, SimulationError> {
        let name = name.into();
        if costs.len() != edges.len() + 1 {
            return Err(SimulationError::ValidationError(format!(
                "{name} cost table: expected {} costs for {} band edges, got {}",
                edges.len() + 1,
                edges.len(),
                costs.len()
            )));
        }

        let mut bands = Vec::with_capacity(costs.len());
        let mut lower = 0.0;
        for (i, &cost) in costs.iter().enumerate() {
            let upper = edges.get(i).copied();
            bands.push(CostBand::new(lower, upper, cost));
            if let Some(u) = upper {
                lower = u;
            }
        }

        let table = Self { name, bands };
        table.validate()?;
        Ok(table)
    }

    /// Unit cost of the band containing `dbh`.
    ///
    /// A diameter of zero, a negative diameter, or NaN matches no band and is
    /// reported as [`SimulationError::CostLookup`].
    pub fn lookup(&self, dbh: f64) -> Result<f64, SimulationError> {
        self.bands
            .iter()
            .find(|band| band.contains(dbh))
            .map(|band| band.unit_cost)
            .ok_or_else(|| SimulationError::CostLookup {
                table: self.name.clone(),
                dbh,
            })
    }

    /// Check the table covers `(0, inf)` with no gaps, overlaps or negative costs.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let invalid = |msg: String| {
            Err(SimulationError::ValidationError(format!(
                "{} cost table: {msg}",
                self.name
            )))
        };

        let Some(first) = self.bands.first() else {
            return invalid("at least one band is required".to_string());
        };
        if first.min_dbh != 0.0 {
            return invalid(format!("first band must start at 0 cm, got {}", first.min_dbh));
        }

        let last_index = self.bands.len() - 1;
        let mut expected_min = 0.0;
        for (i, band) in self.bands.iter().enumerate() {
            if !band.unit_cost.is_finite() || band.unit_cost < 0.0 {
                return invalid(format!("band {i} has invalid cost {}", band.unit_cost));
            }
            if band.min_dbh != expected_min {
                return invalid(format!(
                    "band {i} starts at {} cm but previous band ends at {expected_min} cm",
                    band.min_dbh
                ));
            }
            match band.max_dbh {
                Some(max) if i == last_index => {
                    return invalid(format!("top band must be unbounded, got max {max} cm"));
                }
                Some(max) if !(max > band.min_dbh) => {
                    return invalid(format!(
                        "band {i} is empty or reversed: ({}, {max}]",
                        band.min_dbh
                    ));
                }
                Some(max) => expected_min = max,
                None if i != last_index => {
                    return invalid(format!("only the top band may be unbounded (band {i})"));
                }
                None => {}
            }
        }

        Ok(())
    }
}
