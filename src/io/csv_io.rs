use std::io::Read;
use std::path::Path;

use crate::error::SimulationError;
use crate::models::{ClassSnapshot, CostBreakdown, Phase, YearRecord};

/// Flat CSV row: one simulated year with named numeric columns.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub(crate) struct RecordRow {
    pub year: u32,
    pub phase: String,
    pub inflation_factor: f64,

    pub legacy_count: u64,
    pub replacement_count: u64,
    pub total_count: u64,

    pub legacy_mean_dbh: f64,
    pub replacement_mean_dbh: f64,

    pub legacy_basal_area: f64,
    pub replacement_basal_area: f64,
    pub total_basal_area: f64,

    pub planting_cost: f64,
    pub pruning_cost: f64,
    pub injection_cost: f64,
    pub removal_cost: f64,
    pub total_cost: f64,

    pub cumulative_planting_cost: f64,
    pub cumulative_pruning_cost: f64,
    pub cumulative_injection_cost: f64,
    pub cumulative_removal_cost: f64,
    pub cumulative_total_cost: f64,

    pub legacy_value: f64,
    pub replacement_value: f64,
    pub total_value: f64,
    pub net_value: f64,
}

/// Column names, in `RecordRow` field order.
pub(crate) const HEADERS: [&str; 25] = [
    "year",
    "phase",
    "inflation_factor",
    "legacy_count",
    "replacement_count",
    "total_count",
    "legacy_mean_dbh",
    "replacement_mean_dbh",
    "legacy_basal_area",
    "replacement_basal_area",
    "total_basal_area",
    "planting_cost",
    "pruning_cost",
    "injection_cost",
    "removal_cost",
    "total_cost",
    "cumulative_planting_cost",
    "cumulative_pruning_cost",
    "cumulative_injection_cost",
    "cumulative_removal_cost",
    "cumulative_total_cost",
    "legacy_value",
    "replacement_value",
    "total_value",
    "net_value",
];

impl From<&YearRecord> for RecordRow {
    fn from(r: &YearRecord) -> Self {
        Self {
            year: r.year,
            phase: r.phase.to_string(),
            inflation_factor: r.inflation_factor,
            legacy_count: r.legacy.count,
            replacement_count: r.replacement.count,
            total_count: r.total_count,
            legacy_mean_dbh: r.legacy.mean_dbh,
            replacement_mean_dbh: r.replacement.mean_dbh,
            legacy_basal_area: r.legacy.basal_area,
            replacement_basal_area: r.replacement.basal_area,
            total_basal_area: r.total_basal_area,
            planting_cost: r.annual_cost.planting,
            pruning_cost: r.annual_cost.pruning,
            injection_cost: r.annual_cost.injection,
            removal_cost: r.annual_cost.removal,
            total_cost: r.annual_cost.total(),
            cumulative_planting_cost: r.cumulative_cost.planting,
            cumulative_pruning_cost: r.cumulative_cost.pruning,
            cumulative_injection_cost: r.cumulative_cost.injection,
            cumulative_removal_cost: r.cumulative_cost.removal,
            cumulative_total_cost: r.cumulative_cost.total(),
            legacy_value: r.legacy.value,
            replacement_value: r.replacement.value,
            total_value: r.total_value,
            net_value: r.net_value,
        }
    }
}

impl RecordRow {
    /// Numeric columns after `phase`, in header order.
    pub(crate) fn numbers(&self) -> [f64; 23] {
        [
            self.inflation_factor,
            self.legacy_count as f64,
            self.replacement_count as f64,
            self.total_count as f64,
            self.legacy_mean_dbh,
            self.replacement_mean_dbh,
            self.legacy_basal_area,
            self.replacement_basal_area,
            self.total_basal_area,
            self.planting_cost,
            self.pruning_cost,
            self.injection_cost,
            self.removal_cost,
            self.total_cost,
            self.cumulative_planting_cost,
            self.cumulative_pruning_cost,
            self.cumulative_injection_cost,
            self.cumulative_removal_cost,
            self.cumulative_total_cost,
            self.legacy_value,
            self.replacement_value,
            self.total_value,
            self.net_value,
        ]
    }

    /// Rebuild a record. Totals are recomputed from the class and bucket
    /// columns rather than trusted.
    pub(crate) fn into_record(self) -> Result<YearRecord, SimulationError> {
        let phase: Phase = self.phase.parse()?;
        let legacy = ClassSnapshot {
            count: self.legacy_count,
            mean_dbh: self.legacy_mean_dbh,
            basal_area: self.legacy_basal_area,
            value: self.legacy_value,
        };
        let replacement = ClassSnapshot {
            count: self.replacement_count,
            mean_dbh: self.replacement_mean_dbh,
            basal_area: self.replacement_basal_area,
            value: self.replacement_value,
        };
        let annual = CostBreakdown {
            planting: self.planting_cost,
            pruning: self.pruning_cost,
            injection: self.injection_cost,
            removal: self.removal_cost,
        };
        let cumulative = CostBreakdown {
            planting: self.cumulative_planting_cost,
            pruning: self.cumulative_pruning_cost,
            injection: self.cumulative_injection_cost,
            removal: self.cumulative_removal_cost,
        };
        YearRecord::new(
            self.year,
            phase,
            self.inflation_factor,
            legacy,
            replacement,
            annual,
            cumulative,
        )
        .map_err(|e| match e {
            SimulationError::ValidationError(msg) => SimulationError::ParseError(msg),
            other => other,
        })
    }
}

fn parse_csv_records<R: Read>(
    rdr: &mut csv::Reader<R>,
) -> Result<Vec<YearRecord>, SimulationError> {
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let row: RecordRow = result?;
        records.push(row.into_record()?);
    }
    Ok(records)
}

/// Read year records from a CSV file written by [`write_records_csv`].
pub fn read_records_csv(path: impl AsRef<Path>) -> Result<Vec<YearRecord>, SimulationError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    parse_csv_records(&mut rdr)
}

/// Read year records from CSV bytes.
pub fn read_records_csv_from_bytes(data: &[u8]) -> Result<Vec<YearRecord>, SimulationError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);
    parse_csv_records(&mut rdr)
}

/// Write one run's year records to a CSV file, one row per year.
pub fn write_records_csv(
    records: &[YearRecord],
    path: impl AsRef<Path>,
) -> Result<(), SimulationError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for record in records {
        wtr.serialize(RecordRow::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Locale, Policy};
    use crate::simulation::simulate;

    fn sample_records() -> Vec<YearRecord> {
        let mut site = Locale::Park.config();
        site.horizon_years = 5;
        simulate(&site, &Policy::InjectRemoveReplant {
            injection_years: 2,
            removal_rate: 100,
        })
        .unwrap()
    }

    #[test]
    fn test_csv_roundtrip() {
        let records = sample_records();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");

        write_records_csv(&records, &path).unwrap();
        let loaded = read_records_csv(&path).unwrap();

        assert_eq!(loaded.len(), 5);
        assert_eq!(loaded[2].phase, Phase::Removal { quota: 100 });
        assert_eq!(loaded[4].legacy.count, records[4].legacy.count);
        assert!((loaded[4].net_value - records[4].net_value).abs() < 1e-6);
    }

    #[test]
    fn test_csv_header_row() {
        let records = sample_records();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.csv");
        write_records_csv(&records, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(header, HEADERS.join(","));
        assert_eq!(content.lines().count(), 6);
    }

    #[test]
    fn test_read_from_bytes_bad_phase() {
        let records = sample_records();
        let mut wtr = csv::Writer::from_writer(Vec::new());
        let mut row = RecordRow::from(&records[0]);
        row.phase = "fallow".to_string();
        wtr.serialize(&row).unwrap();
        let data = wtr.into_inner().unwrap();

        let err = read_records_csv_from_bytes(&data).unwrap_err();
        assert!(matches!(err, SimulationError::ParseError(_)));
    }

    #[test]
    fn test_read_from_bytes_count_overflow() {
        let records = sample_records();
        let mut wtr = csv::Writer::from_writer(Vec::new());
        let mut row = RecordRow::from(&records[0]);
        row.legacy_count = u64::MAX;
        row.replacement_count = 1;
        wtr.serialize(&row).unwrap();
        let data = wtr.into_inner().unwrap();

        let err = read_records_csv_from_bytes(&data).unwrap_err();
        match err {
            SimulationError::ParseError(msg) => assert!(msg.contains("overflows")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_records_csv("/definitely/not/here.csv");
        assert!(matches!(result, Err(SimulationError::Csv(_))));
    }
}
