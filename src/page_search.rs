use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExtractError;
use crate::model::PageText;
use crate::options::PageSelection;

pub(crate) const SUSA_MARKER: &str = "Summen und Salden";

static SUSA_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)summen\s*(?:-\s*)?und\s*salden").expect("hardcoded SuSa marker regex is valid")
});

/// First page whose lowercased text contains any of `terms`.
#[must_use]
pub fn find_marker_page<'a>(pages: &'a [PageText], terms: &[String]) -> Option<&'a PageText> {
    pages.iter().find(|page| {
        let lowered = page.text.to_lowercase();
        terms
            .iter()
            .any(|term| lowered.contains(&term.to_lowercase()))
    })
}

/// First and last page carrying the balance list heading.
#[must_use]
pub fn find_susa_page_range(pages: &[PageText]) -> Option<RangeInclusive<u32>> {
    let mut matches = pages
        .iter()
        .filter(|page| SUSA_MARKER_RE.is_match(&page.text))
        .map(|page| page.page_number);
    let first = matches.next()?;
    let last = matches.last().unwrap_or(first);
    Some(first..=last)
}

pub fn validate_page(page: u32, total: u32) -> Result<u32, ExtractError> {
    if page == 0 {
        return Err(ExtractError::InvalidPageSelection(
            "page numbers are 1-based".to_string(),
        ));
    }
    if page > total {
        return Err(ExtractError::PageOutOfRange {
            requested: page,
            total,
        });
    }
    Ok(page)
}

/// Resolves an explicit selection; open ends default to the first/last page.
pub fn resolve_page_range(
    selection: PageSelection,
    total: u32,
) -> Result<RangeInclusive<u32>, ExtractError> {
    let start = selection.start.unwrap_or(1).max(1);
    let end = selection.end.unwrap_or(total).min(total);
    if start > total {
        return Err(ExtractError::PageOutOfRange {
            requested: start,
            total,
        });
    }
    if end < start {
        return Err(ExtractError::InvalidPageSelection(format!(
            "end page {end} must not be before start page {start}"
        )));
    }
    Ok(start..=end)
}
