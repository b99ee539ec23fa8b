use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// An inclusive, 1-based page range. Either end may be left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageSelection {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl PageSelection {
    #[must_use]
    pub fn single(page: u32) -> Self {
        Self {
            start: Some(page),
            end: Some(page),
        }
    }

    #[must_use]
    pub fn range(start: Option<u32>, end: Option<u32>) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

impl FromStr for PageSelection {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        fn parse_page(value: &str) -> Result<Option<u32>, String> {
            let value = value.trim();
            if value.is_empty() {
                return Ok(None);
            }
            let page: u32 = value
                .parse()
                .map_err(|_| format!("invalid page number: '{value}'"))?;
            if page == 0 {
                return Err("pages are 1-based".to_string());
            }
            Ok(Some(page))
        }

        let input = input.trim();
        if input.is_empty() {
            return Err("page selection cannot be empty".to_string());
        }

        let Some((start, end)) = input.split_once('-') else {
            let page = parse_page(input)?;
            return Ok(Self {
                start: page,
                end: page,
            });
        };

        let start = parse_page(start)?;
        let end = parse_page(end)?;
        if let (Some(start), Some(end)) = (start, end)
            && end < start
        {
            return Err(format!("invalid range '{input}': end is smaller than start"));
        }

        Ok(Self { start, end })
    }
}

const DEFAULT_SECTION_BREAK_AFTER: &[&str] = &[
    "Aktivierte Eigenleistungen",
    "Gesamtleistung",
    "Material-/Wareneinkauf",
    "Rohertrag",
    "So. betr. Erlöse",
    "Betrieblicher Rohertrag",
    "Gesamtkosten",
    "Betriebsergebnis",
    "Neutraler Aufwand",
    "Neutraler Ertrag",
    "Kontenklasse unbesetzt",
    "Ergebnis vor Steuern",
    "Steuern Einkommen u. Ertrag",
    "Vorläufiges Ergebnis",
];

const DEFAULT_COST_LABELS: &[&str] = &[
    "Personalkosten",
    "Raumkosten",
    "Betriebliche Steuern",
    "Versicherungen/Beiträge",
    "Besondere Kosten",
    "Fahrzeugkosten (ohne Steuer)",
    "Werbe-/Reisekosten",
    "Kosten Warenabgabe",
    "Abschreibungen",
    "Reparatur/Instandhaltung",
    "Sonstige Kosten",
    "Gesamtkosten",
];

fn to_set(labels: &[&str]) -> BTreeSet<String> {
    labels.iter().map(|label| (*label).to_string()).collect()
}

/// Fixed label vocabulary of a development overview report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLabels {
    /// Text on the header line that carries the month columns.
    pub anchor: String,
    /// Name of the first output column.
    pub label_column: String,
    /// Heading that opens the cost-type section.
    pub sentinel: String,
    pub section_break_after: BTreeSet<String>,
    pub cost_labels: BTreeSet<String>,
    /// Case-folded phrases identifying the report page.
    pub marker_terms: Vec<String>,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            anchor: "Bezeichnung".to_string(),
            label_column: "Bezeichnung".to_string(),
            sentinel: "Kostenarten:".to_string(),
            section_break_after: to_set(DEFAULT_SECTION_BREAK_AFTER),
            cost_labels: to_set(DEFAULT_COST_LABELS),
            marker_terms: vec![
                "entwicklungsübersicht".to_string(),
                "entwicklungsuebersicht".to_string(),
            ],
        }
    }
}

impl ReportLabels {
    pub fn from_json_path(path: &Path) -> Result<Self, ExtractError> {
        let raw = std::fs::read_to_string(path)?;
        let labels: Self = serde_json::from_str(&raw)?;
        if labels.marker_terms.is_empty() {
            return Err(ExtractError::InvalidOption(
                "report labels need at least one marker term".to_string(),
            ));
        }
        Ok(labels)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Amount,
    SignedAmount,
}

/// A named half-open interval `[start, end)` on the horizontal page axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnBound {
    pub name: String,
    pub start: f64,
    pub end: f64,
    pub kind: ColumnKind,
}

impl ColumnBound {
    #[must_use]
    pub fn new(name: impl Into<String>, start: f64, end: f64, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            kind,
        }
    }

    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        self.start <= x && x < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub columns: Vec<ColumnBound>,
    pub account_column: String,
    pub line_bucket: f64,
}

impl Default for ColumnLayout {
    // Measured on the DATEV SuSa print layout.
    fn default() -> Self {
        use ColumnKind::{Amount, SignedAmount, Text};

        Self {
            columns: vec![
                ColumnBound::new("Konto", 0.0, 90.0, Text),
                ColumnBound::new("Beschriftung", 90.0, 320.0, Text),
                ColumnBound::new("EB-Wert", 320.0, 410.0, SignedAmount),
                ColumnBound::new("Okt 2025 Soll", 410.0, 500.0, Amount),
                ColumnBound::new("Okt 2025 Haben", 500.0, 580.0, Amount),
                ColumnBound::new("Kum Werte Soll", 580.0, 660.0, Amount),
                ColumnBound::new("Kum Werte Haben", 660.0, 750.0, Amount),
                ColumnBound::new("Saldo", 750.0, 900.0, SignedAmount),
            ],
            account_column: "Konto".to_string(),
            line_bucket: 1.0,
        }
    }
}

impl ColumnLayout {
    pub fn from_json_path(path: &Path) -> Result<Self, ExtractError> {
        let raw = std::fs::read_to_string(path)?;
        let layout: Self = serde_json::from_str(&raw)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.line_bucket <= 0.0 {
            return Err(ExtractError::InvalidOption(
                "line_bucket must be positive".to_string(),
            ));
        }
        if self.account_index().is_none() {
            return Err(ExtractError::InvalidOption(format!(
                "account column '{}' is not part of the layout",
                self.account_column
            )));
        }

        for column in &self.columns {
            if column.end <= column.start {
                return Err(ExtractError::InvalidOption(format!(
                    "column '{}' requires end > start",
                    column.name
                )));
            }
        }
        for pair in self.columns.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(ExtractError::InvalidOption(format!(
                    "columns '{}' and '{}' overlap or are out of order",
                    pair[0].name, pair[1].name
                )));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }

    #[must_use]
    pub fn account_index(&self) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.name == self.account_column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BwaOptions {
    pub page: Option<u32>,
    pub labels: ReportLabels,
    pub structure: Option<Vec<String>>,
    pub delimiter: u8,
}

impl Default for BwaOptions {
    fn default() -> Self {
        Self {
            page: None,
            labels: ReportLabels::default(),
            structure: None,
            delimiter: b';',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SusaOptions {
    pub pages: PageSelection,
    pub layout: ColumnLayout,
    pub delimiter: u8,
}

impl Default for SusaOptions {
    fn default() -> Self {
        Self {
            pages: PageSelection::default(),
            layout: ColumnLayout::default(),
            delimiter: b';',
        }
    }
}
