use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::ExtractError;
use crate::model::{Cell, OutputTable};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Two decimals with a decimal comma, e.g. `-1234,50`.
#[must_use]
pub fn format_amount(value: f64) -> String {
    // -0.0 + 0.0 is +0.0
    let value = value + 0.0;
    format!("{value:.2}").replace('.', ",")
}

fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Text(text) => text.clone(),
        Cell::Amount(value) => format_amount(*value),
    }
}

fn write_records<W: Write>(
    sink: W,
    table: &OutputTable,
    delimiter: u8,
) -> Result<W, ExtractError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_writer(sink);
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(render_cell))?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|error| ExtractError::Io(error.into_error()))
}

/// Writes UTF-8 with a BOM so spreadsheet tools detect the encoding.
pub(crate) fn write_csv(
    path: &Path,
    table: &OutputTable,
    delimiter: u8,
) -> Result<(), ExtractError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    file.write_all(UTF8_BOM)?;
    let mut file = write_records(file, table, delimiter)?;
    file.flush()?;
    Ok(())
}

pub fn write_csv_to_string(table: &OutputTable, delimiter: u8) -> Result<String, ExtractError> {
    let bytes = write_records(Vec::<u8>::new(), table, delimiter)?;
    String::from_utf8(bytes)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::csv_out::{format_amount, write_csv, write_csv_to_string};
    use crate::model::{Cell, OutputTable};

    fn table() -> OutputTable {
        OutputTable {
            columns: vec!["Konto".to_string(), "Saldo".to_string()],
            rows: vec![
                vec![Cell::from("4400 00"), Cell::Amount(-1234.5)],
                vec![Cell::empty(), Cell::empty()],
            ],
        }
    }

    #[test]
    fn formats_amounts_with_decimal_comma() {
        assert_eq!(format_amount(1234.56), "1234,56");
        assert_eq!(format_amount(-50.0), "-50,00");
        assert_eq!(format_amount(-0.0), "0,00");
    }

    #[test]
    fn renders_semicolon_rows() {
        let csv = write_csv_to_string(&table(), b';').expect("csv renders");
        assert_eq!(csv, "Konto;Saldo\n4400 00;-1234,50\n;\n");
    }

    #[test]
    fn file_output_starts_with_bom() {
        let dir = tempdir().expect("tempdir should be created");
        let path = dir.path().join("nested").join("out.csv");
        write_csv(&path, &table(), b';').expect("csv written");

        let bytes = std::fs::read(&path).expect("CSV should be readable");
        assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
        assert!(String::from_utf8_lossy(&bytes).contains("4400 00;-1234,50"));
    }
}
