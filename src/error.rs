use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to load PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("failed to extract PDF content: {0}")]
    PdfExtract(String),

    #[error("invalid configuration: {0}")]
    Layout(#[from] serde_json::Error),

    #[error("no page containing '{marker}' found in the PDF")]
    MarkerNotFound { marker: String },

    #[error("could not detect 13 month columns on the page (found {found})")]
    HeaderNotFound { found: usize },

    #[error("page {requested} is out of range, the PDF has {total} pages")]
    PageOutOfRange { requested: u32, total: u32 },

    #[error("invalid page selection: {0}")]
    InvalidPageSelection(String),

    #[error("structure has {expected} rows, extracted table has {actual} rows")]
    StructuralMismatch { expected: usize, actual: usize },

    #[error("invalid structure CSV: {}", .0.display())]
    InvalidStructure(PathBuf),

    #[error("no PDF files found in {}", .0.display())]
    NoPdfFiles(PathBuf),

    #[error("invalid option: {0}")]
    InvalidOption(String),
}
