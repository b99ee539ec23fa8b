#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// One positioned character as laid out on the page.
///
/// `x0` is the left edge and `top` the distance of the glyph's upper edge
/// from the top of the page, both in PDF user-space units.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub text: String,
    pub x0: f64,
    pub top: f64,
}

impl Glyph {
    #[must_use]
    pub fn new(text: impl Into<String>, x0: f64, top: f64) -> Self {
        Self {
            text: text.into(),
            x0,
            top,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageGlyphs {
    pub page_number: u32,
    pub glyphs: Vec<Glyph>,
}

/// The 13 month columns of a development overview, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthHeader {
    tokens: Vec<String>,
}

impl MonthHeader {
    pub const WIDTH: usize = 13;

    /// Returns `None` unless exactly [`MonthHeader::WIDTH`] tokens are given.
    #[must_use]
    pub fn new(tokens: Vec<String>) -> Option<Self> {
        (tokens.len() == Self::WIDTH).then_some(Self { tokens })
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row {
    pub label: String,
    pub values: Vec<String>,
}

impl Row {
    #[must_use]
    pub fn new(label: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    #[must_use]
    pub fn blank(width: usize) -> Self {
        Self::labelled_blank("", width)
    }

    /// A row that carries only a label, e.g. a section heading.
    #[must_use]
    pub fn labelled_blank(label: impl Into<String>, width: usize) -> Self {
        Self::new(label, vec![String::new(); width])
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.label.is_empty() && self.values.iter().all(String::is_empty)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Amount(f64),
}

impl Cell {
    #[must_use]
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Amount(_) => None,
        }
    }

    #[must_use]
    pub fn as_amount(&self) -> Option<f64> {
        match self {
            Self::Amount(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Amount(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl OutputTable {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
