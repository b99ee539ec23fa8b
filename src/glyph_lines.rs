use std::collections::BTreeMap;

use crate::model::Glyph;
use crate::options::ColumnBound;

#[derive(Debug, Clone, PartialEq)]
pub struct GlyphLine {
    pub top: f64,
    pub glyphs: Vec<Glyph>,
}

/// Buckets glyphs by rounded vertical position, top of page first.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn group_lines(glyphs: &[Glyph], bucket: f64) -> Vec<GlyphLine> {
    let mut lines: BTreeMap<i64, Vec<Glyph>> = BTreeMap::new();
    for glyph in glyphs {
        let key = (glyph.top / bucket).round() as i64;
        lines.entry(key).or_default().push(glyph.clone());
    }

    lines
        .into_iter()
        .map(|(key, glyphs)| GlyphLine {
            top: key as f64 * bucket,
            glyphs,
        })
        .collect()
}

/// Concatenates the text falling into each column, left to right.
#[must_use]
pub fn slice_columns(glyphs: &[Glyph], columns: &[ColumnBound]) -> Vec<String> {
    let mut sorted = glyphs.iter().collect::<Vec<_>>();
    sorted.sort_by(|left, right| left.x0.total_cmp(&right.x0));

    columns
        .iter()
        .map(|column| {
            sorted
                .iter()
                .filter(|glyph| column.contains(glyph.x0))
                .map(|glyph| glyph.text.as_str())
                .collect::<String>()
                .trim()
                .to_string()
        })
        .collect()
}
