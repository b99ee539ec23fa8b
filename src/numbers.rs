use std::sync::LazyLock;

use regex::Regex;

static DE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-?\d{1,3}(?:\.\d{3})*,\d{2}|-?0,00").expect("hardcoded number regex is valid")
});

/// A decimal token found in a line, with its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberToken<'a> {
    pub start: usize,
    pub text: &'a str,
}

/// Finds German-formatted decimals (`1.234,56`, `-0,00`) in left-to-right order.
#[must_use]
pub fn find_number_tokens(line: &str) -> Vec<NumberToken<'_>> {
    DE_NUMBER_RE
        .find_iter(line)
        .map(|found| NumberToken {
            start: found.start(),
            text: found.as_str(),
        })
        .collect()
}

const DEBIT_SUFFIX: char = 'S';
const CREDIT_SUFFIX: char = 'H';

/// Parses an amount, returning `None` when the cleaned text is not a number.
///
/// A trailing `S` (Soll) or `H` (Haben) is always stripped; with `signed`
/// set, `H` negates the value.
#[must_use]
pub fn try_parse_amount(text: &str, signed: bool) -> Option<f64> {
    if text.is_empty() {
        return Some(0.0);
    }

    let mut cleaned = text.replace(' ', "");
    let mut sign = 1.0;
    if let Some(suffix) = cleaned
        .chars()
        .last()
        .filter(|ch| matches!(*ch, DEBIT_SUFFIX | CREDIT_SUFFIX))
    {
        if signed && suffix == CREDIT_SUFFIX {
            sign = -1.0;
        }
        cleaned.pop();
    }

    let cleaned = cleaned.replace('.', "").replace(',', ".");
    cleaned.parse::<f64>().ok().map(|value| sign * value)
}

/// Like [`try_parse_amount`] but malformed text yields zero.
#[must_use]
pub fn parse_amount(text: &str, signed: bool) -> f64 {
    try_parse_amount(text, signed).unwrap_or(0.0)
}
