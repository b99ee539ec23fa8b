use std::collections::HashSet;

use crate::model::Row;
use crate::options::ReportLabels;

/// Inserts the sentinel heading before the first cost row unless one exists.
#[must_use]
pub fn ensure_sentinel(rows: Vec<Row>, labels: &ReportLabels, width: usize) -> Vec<Row> {
    if rows.iter().any(|row| row.label == labels.sentinel) {
        return rows;
    }
    let Some(first_cost) = rows
        .iter()
        .position(|row| labels.cost_labels.contains(&row.label))
    else {
        return rows;
    };

    let mut out = rows;
    out.insert(first_cost, Row::labelled_blank(labels.sentinel.clone(), width));
    out
}

#[must_use]
pub fn dedupe_rows(rows: Vec<Row>) -> Vec<Row> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect()
}

/// Adds a blank row after every section total plus one at each end.
#[must_use]
pub fn insert_section_breaks(rows: Vec<Row>, labels: &ReportLabels, width: usize) -> Vec<Row> {
    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(Row::blank(width));
    for row in rows {
        let breaks = labels.section_break_after.contains(&row.label);
        out.push(row);
        if breaks {
            out.push(Row::blank(width));
        }
    }
    out.push(Row::blank(width));
    out
}

#[must_use]
pub fn compress_blank_rows(rows: Vec<Row>) -> Vec<Row> {
    let mut out: Vec<Row> = Vec::with_capacity(rows.len());
    for row in rows {
        if row.is_blank() && out.last().is_some_and(Row::is_blank) {
            continue;
        }
        out.push(row);
    }
    out
}

#[must_use]
pub fn annotate_rows(rows: Vec<Row>, labels: &ReportLabels, width: usize) -> Vec<Row> {
    let rows = ensure_sentinel(rows, labels, width);
    let rows = dedupe_rows(rows);
    let rows = insert_section_breaks(rows, labels, width);
    compress_blank_rows(rows)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::annotate::{
        annotate_rows, compress_blank_rows, dedupe_rows, ensure_sentinel, insert_section_breaks,
    };
    use crate::model::Row;
    use crate::options::ReportLabels;

    fn row(label: &str, value: &str) -> Row {
        Row::new(label, vec![value.to_string(); 2])
    }

    #[test]
    fn inserts_sentinel_before_first_cost_row() {
        let labels = ReportLabels::default();
        let rows = vec![
            row("Rohertrag", "1,00"),
            row("Personalkosten", "2,00"),
            row("Raumkosten", "3,00"),
        ];
        let out = ensure_sentinel(rows, &labels, 2);
        assert_eq!(out[1], Row::labelled_blank("Kostenarten:", 2));
        assert_eq!(out[2].label, "Personalkosten");
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn never_duplicates_an_existing_sentinel() {
        let labels = ReportLabels::default();
        let rows = vec![
            Row::labelled_blank("Kostenarten:", 2),
            row("Personalkosten", "2,00"),
        ];
        let out = ensure_sentinel(rows.clone(), &labels, 2);
        assert_eq!(out, rows);
    }

    #[test]
    fn leaves_rows_without_cost_section_unchanged() {
        let labels = ReportLabels::default();
        let rows = vec![row("Umsatzerlöse", "1,00")];
        assert_eq!(ensure_sentinel(rows.clone(), &labels, 2), rows);
    }

    #[test]
    fn dedupe_keeps_first_occurrence_in_order() {
        let rows = vec![
            row("A", "1,00"),
            row("B", "1,00"),
            row("A", "1,00"),
            row("A", "2,00"),
        ];
        let labels = dedupe_rows(rows)
            .into_iter()
            .map(|row| (row.label, row.values[0].clone()))
            .collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec![
                ("A".to_string(), "1,00".to_string()),
                ("B".to_string(), "1,00".to_string()),
                ("A".to_string(), "2,00".to_string()),
            ]
        );
    }

    #[test]
    fn breaks_follow_section_terminal_labels() {
        let labels = ReportLabels::default();
        let rows = vec![row("Umsatzerlöse", "1,00"), row("Gesamtleistung", "1,00")];
        let out = insert_section_breaks(rows, &labels, 2);
        assert_eq!(out.len(), 5);
        assert!(out[0].is_blank());
        assert_eq!(out[2].label, "Gesamtleistung");
        assert!(out[3].is_blank());
        assert!(out[4].is_blank());
    }

    #[test]
    fn compression_is_idempotent() {
        let rows = vec![
            Row::blank(2),
            Row::blank(2),
            row("A", "1,00"),
            Row::blank(2),
            Row::blank(2),
            Row::blank(2),
            row("B", "1,00"),
        ];
        let once = compress_blank_rows(rows);
        assert_eq!(once.len(), 4);
        assert_eq!(compress_blank_rows(once.clone()), once);
    }

    #[test]
    fn sentinel_survives_blank_compression() {
        let labels = ReportLabels::default();
        let rows = vec![
            row("Betrieblicher Rohertrag", "1,00"),
            row("Personalkosten", "2,00"),
        ];
        let out = annotate_rows(rows, &labels, 2);
        let names = out.iter().map(|row| row.label.as_str()).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "",
                "Betrieblicher Rohertrag",
                "",
                "Kostenarten:",
                "Personalkosten",
                ""
            ]
        );
    }
}
