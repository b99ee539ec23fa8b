use crate::model::{MonthHeader, Row};
use crate::numbers::find_number_tokens;

/// Splits one line into a label and its trailing month values.
///
/// The last `width` decimal tokens become the values; any earlier tokens stay
/// part of the label. A label that itself holds `width` or more decimal-looking
/// substrings is misread.
#[must_use]
pub fn parse_row(line: &str, width: usize, sentinel: &str) -> Option<Row> {
    let line = line.trim();
    if line.is_empty() || width == 0 {
        return None;
    }
    if line == sentinel {
        return Some(Row::labelled_blank(sentinel, width));
    }

    let tokens = find_number_tokens(line);
    if tokens.len() < width {
        return None;
    }

    let values = &tokens[tokens.len() - width..];
    let label = line[..values[0].start].trim();
    Some(Row::new(
        label,
        values.iter().map(|token| token.text.to_string()).collect(),
    ))
}

#[must_use]
pub fn parse_rows_from_text(text: &str, header: &MonthHeader, sentinel: &str) -> Vec<Row> {
    text.lines()
        .filter_map(|line| parse_row(line, header.len(), sentinel))
        .collect()
}
