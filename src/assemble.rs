use std::path::Path;

use csv::ReaderBuilder;

use crate::error::ExtractError;
use crate::model::{Cell, MonthHeader, OutputTable, Row};

pub fn build_output_table(
    header: &MonthHeader,
    rows: &[Row],
    structure: Option<&[String]>,
    label_column: &str,
) -> Result<OutputTable, ExtractError> {
    if let Some(structure) = structure
        && structure.len() != rows.len()
    {
        return Err(ExtractError::StructuralMismatch {
            expected: structure.len(),
            actual: rows.len(),
        });
    }

    let mut columns = Vec::with_capacity(header.len() + 1);
    columns.push(label_column.to_string());
    columns.extend(header.tokens().iter().cloned());

    let rows = rows
        .iter()
        .map(|row| {
            if row.is_blank() {
                return vec![Cell::empty(); header.len() + 1];
            }
            let mut cells = Vec::with_capacity(header.len() + 1);
            cells.push(Cell::from(row.label.as_str()));
            cells.extend(row.values.iter().map(|value| Cell::from(value.as_str())));
            cells
        })
        .collect();

    Ok(OutputTable { columns, rows })
}

/// Reads the first-column identifiers of a semicolon structure CSV.
pub fn load_structure_reference(path: &Path) -> Result<Vec<String>, ExtractError> {
    let raw = std::fs::read_to_string(path)?;
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(raw.as_bytes());

    if reader.headers()?.len() < 2 {
        return Err(ExtractError::InvalidStructure(path.to_path_buf()));
    }

    let mut numbers = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(first) = record.get(0) {
            numbers.push(first.trim().to_string());
        }
    }
    Ok(numbers)
}
