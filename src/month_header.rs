use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::ExtractError;
use crate::model::MonthHeader;

static MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:Jan(?:uar)?|Feb(?:ruar)?|M(?:ärz?|aerz?|rz|ar)|Apr(?:il)?|Mai|Jun(?:i)?|Jul(?:i)?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Okt(?:ober)?|Nov(?:ember)?|Dez(?:ember)?)\.?\s*(?:[/.\-]\s*|\s+)\d{2,4}\b",
    )
    .expect("hardcoded month regex is valid")
});

static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*([/.\-])\s*").expect("hardcoded separator regex is valid")
});

/// Collapses whitespace and tightens `/`, `.` and `-` separators.
#[must_use]
pub fn normalize_month_token(token: &str) -> String {
    let collapsed = token.split_whitespace().collect::<Vec<_>>().join(" ");
    SEPARATOR_RE.replace_all(&collapsed, "$1").into_owned()
}

/// Distinct normalized month tokens in order of first appearance.
#[must_use]
pub fn extract_month_tokens(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    MONTH_RE
        .find_iter(text)
        .map(|found| normalize_month_token(found.as_str()))
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

fn last_thirteen(mut tokens: Vec<String>) -> Option<MonthHeader> {
    if tokens.len() < MonthHeader::WIDTH {
        return None;
    }
    let tail = tokens.split_off(tokens.len() - MonthHeader::WIDTH);
    MonthHeader::new(tail)
}

pub fn detect_month_header(text: &str, anchor: &str) -> Result<MonthHeader, ExtractError> {
    for line in text.lines().filter(|line| line.contains(anchor)) {
        if let Some(header) = last_thirteen(extract_month_tokens(line)) {
            debug!(anchor, "month header found on anchor line");
            return Ok(header);
        }
    }

    let tokens = extract_month_tokens(text);
    let found = tokens.len();
    last_thirteen(tokens).ok_or(ExtractError::HeaderNotFound { found })
}

#[cfg(test)]
mod tests {
    use crate::error::ExtractError;
    use crate::month_header::{detect_month_header, extract_month_tokens, normalize_month_token};

    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
    ];

    fn header_line(start_year: u32) -> String {
        let mut tokens = MONTHS
            .iter()
            .map(|month| format!("{month}/{start_year}"))
            .collect::<Vec<_>>();
        tokens.push(format!("Jan/{}", start_year + 1));
        format!("Bezeichnung {}", tokens.join(" "))
    }

    #[test]
    fn normalizes_spacing_around_separators() {
        assert_eq!(normalize_month_token("Sep /  2024"), "Sep/2024");
        assert_eq!(normalize_month_token("März   24"), "März 24");
        assert_eq!(normalize_month_token("Okt - 24"), "Okt-24");
    }

    #[test]
    fn deduplicates_by_normalized_form() {
        let tokens = extract_month_tokens("Jan/2024 Jan / 2024 Feb 24 Feb  24");
        assert_eq!(tokens, vec!["Jan/2024", "Feb 24"]);
    }

    #[test]
    fn detects_header_on_anchor_line() {
        let text = format!("Entwicklungsübersicht\n{}\nUmsatzerlöse 1,00", header_line(2024));
        let header = detect_month_header(&text, "Bezeichnung").expect("header should be found");
        assert_eq!(header.len(), 13);
        assert_eq!(header.tokens()[0], "Jan/2024");
        assert_eq!(header.tokens()[12], "Jan/2025");
    }

    #[test]
    fn keeps_the_rightmost_thirteen() {
        let text = format!("Stand Dez/2023\n{}", header_line(2024).replace("Bezeichnung", ""));
        let header = detect_month_header(&text, "Bezeichnung").expect("header should be found");
        assert_eq!(header.tokens()[0], "Jan/2024");
        assert!(!header.tokens().contains(&"Dez/2023".to_string()));
    }

    #[test]
    fn falls_back_to_whole_page_when_anchor_line_is_short() {
        let line = header_line(2024);
        let (first, rest) = line.split_at(line.find("Jul").expect("July is present"));
        let text = format!("{first}\n{rest}");
        let header = detect_month_header(&text, "Bezeichnung").expect("header should be found");
        assert_eq!(header.tokens()[6], "Jul/2024");
    }

    #[test]
    fn fails_with_fewer_than_thirteen_months() {
        let err = detect_month_header("Bezeichnung Jan/2024 Feb/2024", "Bezeichnung")
            .expect_err("two months are not a header");
        assert!(matches!(err, ExtractError::HeaderNotFound { found: 2 }));
    }
}
