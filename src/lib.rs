mod annotate;
mod assemble;
mod batch;
mod bwa;
mod csv_out;
mod error;
mod glyph_lines;
mod glyphs;
mod model;
mod month_header;
mod numbers;
mod options;
mod page_search;
mod pdf_reader;
mod row_extract;
mod susa;
mod warning;

use std::ops::RangeInclusive;
use std::path::Path;

use tracing::{info, warn};

use crate::csv_out::write_csv;
use crate::glyphs::read_page_glyphs;
use crate::page_search::{SUSA_MARKER, find_susa_page_range, resolve_page_range};
use crate::pdf_reader::{page_count, read_pdf_pages};

pub use annotate::{
    annotate_rows, compress_blank_rows, dedupe_rows, ensure_sentinel, insert_section_breaks,
};
pub use assemble::{build_output_table, load_structure_reference};
pub use batch::{BatchSummary, ReportKind, ReportOptions, convert_batch, output_path_for};
pub use bwa::extract_bwa_table;
pub use csv_out::{format_amount, write_csv_to_string};
pub use error::ExtractError;
pub use glyph_lines::{GlyphLine, group_lines, slice_columns};
pub use model::{Cell, Glyph, MonthHeader, OutputTable, PageGlyphs, PageText, Row};
pub use month_header::{detect_month_header, extract_month_tokens, normalize_month_token};
pub use numbers::{NumberToken, find_number_tokens, parse_amount, try_parse_amount};
pub use options::{
    BwaOptions, ColumnBound, ColumnKind, ColumnLayout, PageSelection, ReportLabels, SusaOptions,
};
pub use page_search::{find_marker_page, validate_page};
pub use row_extract::{parse_row, parse_rows_from_text};
pub use susa::{build_susa_table, is_account_row};
pub use warning::{ExtractWarning, WarningCode};

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionReport {
    pub row_count: usize,
    pub pages: RangeInclusive<u32>,
    pub warnings: Vec<ExtractWarning>,
}

impl ExtractionReport {
    /// Number of cells that could not be read and were written as zero.
    #[must_use]
    pub fn fallback_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|warning| warning.code == WarningCode::AmountFallbackZero)
            .count()
    }
}

pub fn extract_bwa(
    input_pdf: &Path,
    options: &BwaOptions,
) -> Result<(OutputTable, ExtractionReport), ExtractError> {
    let pages = read_pdf_pages(input_pdf)?;
    let page = bwa::select_bwa_page(&pages, options)?;
    let (header, table) =
        extract_bwa_table(&page.text, &options.labels, options.structure.as_deref())?;
    info!(
        page = page.page_number,
        first_month = %header.tokens()[0],
        rows = table.row_count(),
        "extracted development overview"
    );

    let mut warnings = Vec::new();
    if !bwa::has_data_rows(&table, &options.labels.sentinel) {
        warn!(page = page.page_number, "month header found but no value rows");
        warnings.push(
            ExtractWarning::new(
                WarningCode::NoRowsExtracted,
                "no value rows found below the month header",
            )
            .with_page(page.page_number),
        );
    }

    let report = ExtractionReport {
        row_count: table.row_count(),
        pages: page.page_number..=page.page_number,
        warnings,
    };
    Ok((table, report))
}

pub fn extract_bwa_to_csv(
    input_pdf: &Path,
    output_csv: &Path,
    options: &BwaOptions,
) -> Result<ExtractionReport, ExtractError> {
    let (table, report) = extract_bwa(input_pdf, options)?;
    write_csv(output_csv, &table, options.delimiter)?;
    Ok(report)
}

fn susa_page_range(
    input_pdf: &Path,
    options: &SusaOptions,
) -> Result<RangeInclusive<u32>, ExtractError> {
    if options.pages.is_open() {
        let pages = read_pdf_pages(input_pdf)?;
        let range = find_susa_page_range(&pages).ok_or_else(|| ExtractError::MarkerNotFound {
            marker: SUSA_MARKER.to_string(),
        })?;
        info!(first = *range.start(), last = *range.end(), "located balance list");
        return Ok(range);
    }

    resolve_page_range(options.pages, page_count(input_pdf)?)
}

pub fn extract_susa(
    input_pdf: &Path,
    options: &SusaOptions,
) -> Result<(OutputTable, ExtractionReport), ExtractError> {
    options.layout.validate()?;
    let range = susa_page_range(input_pdf, options)?;
    let pages = read_page_glyphs(input_pdf, &range)?;

    let mut warnings = Vec::new();
    let table = build_susa_table(&pages, &options.layout, &mut warnings);
    if table.rows.is_empty() {
        warnings.push(ExtractWarning::new(
            WarningCode::NoRowsExtracted,
            "no account rows found in the selected pages",
        ));
    }

    let report = ExtractionReport {
        row_count: table.row_count(),
        pages: range,
        warnings,
    };
    if report.fallback_count() > 0 {
        warn!(
            fallbacks = report.fallback_count(),
            "some amounts were unreadable and written as zero"
        );
    }
    Ok((table, report))
}

pub fn extract_susa_to_csv(
    input_pdf: &Path,
    output_csv: &Path,
    options: &SusaOptions,
) -> Result<ExtractionReport, ExtractError> {
    let (table, report) = extract_susa(input_pdf, options)?;
    write_csv(output_csv, &table, options.delimiter)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use crate::ExtractionReport;
    use crate::warning::{ExtractWarning, WarningCode};

    #[test]
    fn counts_only_zero_fallbacks() {
        let report = ExtractionReport {
            row_count: 3,
            pages: 1..=2,
            warnings: vec![
                ExtractWarning::new(WarningCode::AmountFallbackZero, "a"),
                ExtractWarning::new(WarningCode::NoRowsExtracted, "b"),
                ExtractWarning::new(WarningCode::AmountFallbackZero, "c"),
            ],
        };
        assert_eq!(report.fallback_count(), 2);
    }
}
