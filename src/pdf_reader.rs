use std::collections::BTreeMap;
use std::path::Path;

use encoding_rs::UTF_16BE;
use lopdf::Document;
use lopdf::Object;
use lopdf::content::Content;
use tracing::debug;

use crate::error::ExtractError;
use crate::model::{MonthHeader, PageText};
use crate::numbers::find_number_tokens;

fn split_text_into_pages(raw_text: &str) -> Vec<String> {
    let mut pages = raw_text
        .split('\u{000C}')
        .map(str::to_string)
        .collect::<Vec<_>>();
    if pages.last().is_some_and(String::is_empty) {
        pages.pop();
    }
    pages
}

fn looks_decoding_broken(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    if text.contains("?Identity-H Unimplemented?") {
        return true;
    }

    let total = text.chars().count();
    let replacement = text.matches('\u{FFFD}').count();
    let control = text
        .chars()
        .filter(|ch| ch.is_control() && !matches!(ch, '\n' | '\r' | '\t'))
        .count();

    replacement * 8 > total || control * 5 > total
}

fn decode_pdf_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
    let decoded = Document::decode_text(encoding, bytes);
    if !looks_decoding_broken(&decoded) {
        return decoded;
    }

    let utf16_hint = encoding.is_some_and(|name| {
        let lower = name.to_ascii_lowercase();
        lower.contains("utf16") || lower.contains("ucs2") || lower.contains("identity-h")
    });
    if bytes.starts_with(&[0xFE, 0xFF]) || utf16_hint {
        let bytes = bytes.strip_prefix(&[0xFE, 0xFF]).unwrap_or(bytes);
        let (utf16, had_errors) = UTF_16BE.decode_without_bom_handling(bytes);
        if !had_errors && !utf16.is_empty() {
            return utf16.into_owned();
        }
    }

    String::from_utf8_lossy(bytes).to_string()
}

/// Prefers text whose lines hold a full row of month values.
///
/// Splitting on every text move leaves one number per line, so lines with
/// several decimals weigh far more than lines with a single one.
fn extraction_quality_score(text: &str) -> i64 {
    if text.trim().is_empty() {
        return i64::MIN / 4;
    }

    let mut non_empty_lines = 0_i64;
    let mut row_lines = 0_i64;
    let mut multi_value_lines = 0_i64;
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        non_empty_lines += 1;
        let tokens = find_number_tokens(line).len();
        if tokens >= MonthHeader::WIDTH {
            row_lines += 1;
        }
        if tokens >= 2 {
            multi_value_lines += 1;
        }
    }

    let broken_penalty = if looks_decoding_broken(text) { 800 } else { 0 };
    row_lines * 50 + multi_value_lines * 10 + non_empty_lines - broken_penalty
}

fn extract_text_from_page_content(document: &Document, page_id: lopdf::ObjectId) -> Option<String> {
    fn collect_text(text: &mut String, encoding: Option<&str>, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => text.push_str(&decode_pdf_bytes(encoding, bytes)),
                Object::Array(items) => collect_text(text, encoding, items),
                Object::Integer(value) if *value < -100 => text.push(' '),
                _ => {}
            }
        }
    }

    let raw_content = document.get_page_content(page_id).ok()?;
    let content = Content::decode(&raw_content).ok()?;
    let encodings = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect::<BTreeMap<Vec<u8>, &str>>();

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_encoding = None;
    for operation in content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                if let Some(font_name) = operation
                    .operands
                    .first()
                    .and_then(|operand| operand.as_name().ok())
                {
                    current_encoding = encodings.get(font_name).copied();
                }
            }
            "Tj" | "TJ" | "'" | "\"" => {
                collect_text(&mut current, current_encoding, &operation.operands);
            }
            "T*" | "Td" | "TD" | "ET" => {
                if !current.trim().is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        }
    }
    if !current.trim().is_empty() {
        lines.push(current);
    }

    (!lines.is_empty()).then(|| lines.join("\n"))
}

pub(crate) fn page_count(input_pdf: &Path) -> Result<u32, ExtractError> {
    let document = Document::load(input_pdf)?;
    u32::try_from(document.get_pages().len())
        .map_err(|_| ExtractError::PdfExtract("page count exceeds u32".to_string()))
}

/// Reads the text of every page, choosing the best of several extractions.
pub(crate) fn read_pdf_pages(input_pdf: &Path) -> Result<Vec<PageText>, ExtractError> {
    let document = Document::load(input_pdf)?;
    let pages_map = document.get_pages();

    let pdf_extract_pages = pdf_extract::extract_text(input_pdf)
        .ok()
        .map(|text| split_text_into_pages(&text))
        .filter(|pages| pages.len() == pages_map.len());
    if pdf_extract_pages.is_none() {
        debug!("pdf-extract page split unavailable, using content streams only");
    }

    let mut pages = Vec::with_capacity(pages_map.len());
    for (index, (page_no, page_id)) in pages_map.iter().enumerate() {
        let mut candidates = Vec::new();
        if let Some(text) = pdf_extract_pages
            .as_ref()
            .and_then(|split| split.get(index).cloned())
            .filter(|text| !text.trim().is_empty())
        {
            candidates.push(text);
        }
        if let Some(text) = extract_text_from_page_content(&document, *page_id) {
            candidates.push(text);
        }
        if let Some(text) = document
            .extract_text(&[*page_no])
            .ok()
            .filter(|text| !text.trim().is_empty())
        {
            candidates.push(text);
        }

        let text = candidates
            .into_iter()
            .max_by_key(|text| extraction_quality_score(text))
            .unwrap_or_default();
        pages.push(PageText {
            page_number: *page_no,
            text,
        });
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use crate::pdf_reader::{decode_pdf_bytes, extraction_quality_score, split_text_into_pages};

    #[test]
    fn splits_form_feed_delimited_pages() {
        let pages = split_text_into_pages("p1\u{000C}p2\u{000C}");
        assert_eq!(pages, vec!["p1", "p2"]);
    }

    #[test]
    fn decodes_utf16_with_bom() {
        let bytes = [0xFE, 0xFF, 0x00, 0xE4, 0x00, 0x62];
        assert_eq!(decode_pdf_bytes(Some("Identity-H"), &bytes), "äb");
    }

    #[test]
    fn numeric_lines_score_higher() {
        let plain = "Bezeichnung\nUmsatzerlöse\nRohertrag";
        let tabular = "Bezeichnung\nUmsatzerlöse 1,00 2,00\nRohertrag 3,00";
        assert!(extraction_quality_score(tabular) > extraction_quality_score(plain));
    }

    #[test]
    fn joined_rows_beat_one_value_per_line() {
        let rows = ["Umsatzerlöse", "Rohertrag", "Personalkosten"];
        let joined = rows
            .iter()
            .map(|label| format!("{label} {}", vec!["1,00"; 13].join(" ")))
            .collect::<Vec<_>>()
            .join("\n");
        let split = rows
            .iter()
            .map(|label| format!("{label}\n{}", vec!["1,00"; 13].join("\n")))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(extraction_quality_score(&joined) > extraction_quality_score(&split));
    }
}
