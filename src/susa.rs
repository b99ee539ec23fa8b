use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::glyph_lines::{group_lines, slice_columns};
use crate::model::{Cell, OutputTable, PageGlyphs};
use crate::numbers::try_parse_amount;
use crate::options::{ColumnKind, ColumnLayout};
use crate::warning::{ExtractWarning, WarningCode};

static ACCOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{3,4}\s*\d{2}$").expect("hardcoded account regex is valid")
});

/// Ledger rows start with an account number such as `4400 00`.
#[must_use]
pub fn is_account_row(account: &str) -> bool {
    ACCOUNT_RE.is_match(account.trim())
}

fn to_cell(
    text: String,
    kind: ColumnKind,
    column: &str,
    page: u32,
    warnings: &mut Vec<ExtractWarning>,
) -> Cell {
    let signed = match kind {
        ColumnKind::Text => return Cell::Text(text),
        ColumnKind::Amount => false,
        ColumnKind::SignedAmount => true,
    };

    try_parse_amount(&text, signed).map_or_else(
        || {
            warn!(page, column, text = %text, "unreadable amount, using 0");
            warnings.push(
                ExtractWarning::new(
                    WarningCode::AmountFallbackZero,
                    format!("could not parse amount '{text}'"),
                )
                .with_page(page)
                .with_column(column),
            );
            Cell::Amount(0.0)
        },
        Cell::Amount,
    )
}

/// Builds the balance list from positioned glyphs of the selected pages.
#[must_use]
pub fn build_susa_table(
    pages: &[PageGlyphs],
    layout: &ColumnLayout,
    warnings: &mut Vec<ExtractWarning>,
) -> OutputTable {
    let account_index = layout.account_index().unwrap_or(0);
    let mut rows = Vec::new();

    for page in pages {
        for line in group_lines(&page.glyphs, layout.line_bucket) {
            let texts = slice_columns(&line.glyphs, &layout.columns);
            if !texts
                .get(account_index)
                .is_some_and(|account| is_account_row(account))
            {
                continue;
            }

            let row = texts
                .into_iter()
                .zip(&layout.columns)
                .map(|(text, column)| {
                    to_cell(text, column.kind, &column.name, page.page_number, warnings)
                })
                .collect::<Vec<_>>();
            rows.push(row);
        }
    }

    OutputTable {
        columns: layout.names(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::model::{Cell, Glyph, PageGlyphs};
    use crate::options::ColumnLayout;
    use crate::susa::{build_susa_table, is_account_row};
    use crate::warning::WarningCode;

    fn text_at(text: &str, x: f64, top: f64) -> Vec<Glyph> {
        text.chars()
            .zip(0_u32..)
            .map(|(ch, index)| Glyph::new(ch.to_string(), x + f64::from(index) * 6.0, top))
            .collect()
    }

    #[test]
    fn account_pattern_accepts_ledger_numbers_only() {
        assert!(is_account_row("4400 00"));
        assert!(is_account_row(" 120000 "));
        assert!(is_account_row("480 10"));
        assert!(!is_account_row("Summe Klasse 4"));
        assert!(!is_account_row("44 00"));
        assert!(!is_account_row(""));
    }

    #[test]
    fn builds_signed_rows_and_skips_non_accounts() {
        let mut glyphs = Vec::new();
        glyphs.extend(text_at("4400 00", 10.0, 100.0));
        glyphs.extend(text_at("Erlöse 19% USt", 100.0, 100.2));
        glyphs.extend(text_at("1.000,00H", 330.0, 100.0));
        glyphs.extend(text_at("50,00", 420.0, 100.0));
        glyphs.extend(text_at("250,00H", 760.0, 99.9));
        glyphs.extend(text_at("Summe Klasse 4", 10.0, 120.0));
        glyphs.extend(text_at("9.999,00", 760.0, 120.0));
        let pages = vec![PageGlyphs {
            page_number: 2,
            glyphs,
        }];

        let mut warnings = Vec::new();
        let table = build_susa_table(&pages, &ColumnLayout::default(), &mut warnings);
        assert!(warnings.is_empty());
        assert_eq!(table.columns[0], "Konto");
        assert_eq!(table.row_count(), 1);

        let row = &table.rows[0];
        assert_eq!(row[0], Cell::from("4400 00"));
        assert_eq!(row[1], Cell::from("Erlöse 19% USt"));
        assert_eq!(row[0].as_amount(), None);
        assert_eq!(row[2].as_amount(), Some(-1000.0));
        assert_eq!(row[3].as_amount(), Some(50.0));
        assert_eq!(row[4].as_amount(), Some(0.0));
        assert_eq!(row[7].as_amount(), Some(-250.0));
    }

    #[test]
    fn unreadable_amounts_become_zero_with_a_warning() {
        let mut glyphs = text_at("1200 00", 10.0, 50.0);
        glyphs.extend(text_at("12,3x", 420.0, 50.0));
        let pages = vec![PageGlyphs {
            page_number: 5,
            glyphs,
        }];

        let mut warnings = Vec::new();
        let table = build_susa_table(&pages, &ColumnLayout::default(), &mut warnings);
        assert_eq!(table.rows[0][3].as_amount(), Some(0.0));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::AmountFallbackZero);
        assert_eq!(warnings[0].page, Some(5));
        assert_eq!(warnings[0].column.as_deref(), Some("Okt 2025 Soll"));
    }
}
