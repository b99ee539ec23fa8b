use tracing::{debug, info};

use crate::annotate::annotate_rows;
use crate::assemble::build_output_table;
use crate::error::ExtractError;
use crate::model::{Cell, MonthHeader, OutputTable, PageText};
use crate::month_header::detect_month_header;
use crate::options::{BwaOptions, ReportLabels};
use crate::page_search::{find_marker_page, validate_page};
use crate::row_extract::parse_rows_from_text;

/// Turns the text of a development overview page into the output table.
pub fn extract_bwa_table(
    text: &str,
    labels: &ReportLabels,
    structure: Option<&[String]>,
) -> Result<(MonthHeader, OutputTable), ExtractError> {
    let header = detect_month_header(text, &labels.anchor)?;
    let width = header.len();

    let rows = parse_rows_from_text(text, &header, &labels.sentinel);
    debug!(rows = rows.len(), "parsed candidate rows");
    let rows = annotate_rows(rows, labels, width);

    let table = build_output_table(&header, &rows, structure, &labels.label_column)?;
    Ok((header, table))
}

/// Whether any row besides blanks and the sentinel heading made it into the table.
pub(crate) fn has_data_rows(table: &OutputTable, sentinel: &str) -> bool {
    table.rows.iter().any(|row| {
        let label = row.first().and_then(Cell::as_text).unwrap_or_default();
        label != sentinel && row.iter().any(|cell| *cell != Cell::empty())
    })
}

pub(crate) fn select_bwa_page<'a>(
    pages: &'a [PageText],
    options: &BwaOptions,
) -> Result<&'a PageText, ExtractError> {
    let Some(requested) = options.page else {
        let page = find_marker_page(pages, &options.labels.marker_terms).ok_or_else(|| {
            ExtractError::MarkerNotFound {
                marker: options
                    .labels
                    .marker_terms
                    .first()
                    .cloned()
                    .unwrap_or_default(),
            }
        })?;
        info!(page = page.page_number, "located development overview");
        return Ok(page);
    };

    let total = u32::try_from(pages.len()).unwrap_or(u32::MAX);
    let page = validate_page(requested, total)?;
    pages
        .iter()
        .find(|candidate| candidate.page_number == page)
        .ok_or(ExtractError::PageOutOfRange {
            requested: page,
            total,
        })
}
