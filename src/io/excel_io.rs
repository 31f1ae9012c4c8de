use std::path::Path;

use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};

use super::csv_io::{RecordRow, HEADERS};
use crate::error::SimulationError;
use crate::models::YearRecord;

/// Read year records from the first sheet of a workbook written by
/// [`write_records_excel`].
pub fn read_records_excel(path: impl AsRef<Path>) -> Result<Vec<YearRecord>, SimulationError> {
    let mut workbook: Xlsx<_> = open_workbook(path.as_ref())?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| SimulationError::Excel("No sheets found in workbook".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| SimulationError::Excel(e.to_string()))?;

    let mut records = Vec::new();
    let mut rows = range.rows();
    // Skip header row
    rows.next();

    for (i, row) in rows.enumerate() {
        if row.len() < HEADERS.len() {
            return Err(SimulationError::Excel(format!(
                "row {} has {} columns, expected {}",
                i + 2,
                row.len(),
                HEADERS.len()
            )));
        }
        let number = |idx: usize| -> Result<f64, SimulationError> {
            cell_number(&row[idx]).ok_or_else(|| {
                SimulationError::Excel(format!(
                    "row {}: column '{}' is not a number",
                    i + 2,
                    HEADERS[idx]
                ))
            })
        };

        let parsed = RecordRow {
            year: number(0)? as u32,
            phase: row[1].to_string(),
            inflation_factor: number(2)?,
            legacy_count: number(3)? as u64,
            replacement_count: number(4)? as u64,
            total_count: number(5)? as u64,
            legacy_mean_dbh: number(6)?,
            replacement_mean_dbh: number(7)?,
            legacy_basal_area: number(8)?,
            replacement_basal_area: number(9)?,
            total_basal_area: number(10)?,
            planting_cost: number(11)?,
            pruning_cost: number(12)?,
            injection_cost: number(13)?,
            removal_cost: number(14)?,
            total_cost: number(15)?,
            cumulative_planting_cost: number(16)?,
            cumulative_pruning_cost: number(17)?,
            cumulative_injection_cost: number(18)?,
            cumulative_removal_cost: number(19)?,
            cumulative_total_cost: number(20)?,
            legacy_value: number(21)?,
            replacement_value: number(22)?,
            total_value: number(23)?,
            net_value: number(24)?,
        };
        records.push(parsed.into_record()?);
    }

    Ok(records)
}

fn cell_number(cell: &Data) -> Option<f64> {
    cell.get_float().or_else(|| cell.get_int().map(|v| v as f64))
}

/// Write one run's year records to an Excel (.xlsx) workbook.
pub fn write_records_excel(
    records: &[YearRecord],
    path: impl AsRef<Path>,
) -> Result<(), SimulationError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| SimulationError::Excel(e.to_string()))?;
    }

    for (i, record) in records.iter().enumerate() {
        let row_idx = i as u32 + 1;
        let row = RecordRow::from(record);
        worksheet
            .write_number(row_idx, 0, row.year as f64)
            .map_err(|e| SimulationError::Excel(e.to_string()))?;
        worksheet
            .write_string(row_idx, 1, &row.phase)
            .map_err(|e| SimulationError::Excel(e.to_string()))?;
        for (offset, value) in row.numbers().iter().enumerate() {
            worksheet
                .write_number(row_idx, offset as u16 + 2, *value)
                .map_err(|e| SimulationError::Excel(e.to_string()))?;
        }
    }

    workbook
        .save(path.as_ref())
        .map_err(|e| SimulationError::Excel(e.to_string()))?;
    Ok(())
}
