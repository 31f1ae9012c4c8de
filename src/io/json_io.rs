use std::path::Path;

use crate::error::SimulationError;
use crate::models::YearRecord;

/// Read year records from a JSON array.
pub fn read_records_json(path: impl AsRef<Path>) -> Result<Vec<YearRecord>, SimulationError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let records: Vec<YearRecord> = serde_json::from_str(&content)?;
    Ok(records)
}

/// Read year records from JSON bytes.
pub fn read_records_json_from_bytes(data: &[u8]) -> Result<Vec<YearRecord>, SimulationError> {
    let content = std::str::from_utf8(data)
        .map_err(|e| SimulationError::ParseError(format!("Invalid UTF-8: {e}")))?;
    Ok(serde_json::from_str(content)?)
}

/// Write year records as a JSON array.
pub fn write_records_json(
    records: &[YearRecord],
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), SimulationError> {
    let content = if pretty {
        serde_json::to_string_pretty(records)?
    } else {
        serde_json::to_string(records)?
    };
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}
