use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::ExtractError;
use crate::options::{BwaOptions, SusaOptions};
use crate::{extract_bwa_to_csv, extract_susa_to_csv};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Bwa,
    Susa,
}

impl ReportKind {
    #[must_use]
    pub const fn file_suffix(self) -> &'static str {
        match self {
            Self::Bwa => "jahresentwicklung",
            Self::Susa => "susa",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportOptions {
    Bwa(BwaOptions),
    Susa(SusaOptions),
}

impl ReportOptions {
    #[must_use]
    pub const fn kind(&self) -> ReportKind {
        match self {
            Self::Bwa(_) => ReportKind::Bwa,
            Self::Susa(_) => ReportKind::Susa,
        }
    }

    fn convert(&self, input_pdf: &Path, output_csv: &Path) -> Result<usize, ExtractError> {
        let report = match self {
            Self::Bwa(options) => extract_bwa_to_csv(input_pdf, output_csv, options)?,
            Self::Susa(options) => extract_susa_to_csv(input_pdf, output_csv, options)?,
        };
        Ok(report.row_count)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub written: Vec<PathBuf>,
    pub existing: Vec<PathBuf>,
    pub skipped: Vec<(PathBuf, String)>,
}

/// `<out_dir>/<stem>_<suffix>.csv` for one input PDF.
#[must_use]
pub fn output_path_for(out_dir: &Path, input_pdf: &Path, kind: ReportKind) -> PathBuf {
    let stem = input_pdf
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    out_dir.join(format!("{stem}_{}.csv", kind.file_suffix()))
}

fn list_pdfs(input_dir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    let mut pdfs = std::fs::read_dir(input_dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect::<Vec<_>>();
    pdfs.sort();
    Ok(pdfs)
}

/// Converts every PDF in `input_dir`; one failing document does not stop the rest.
pub fn convert_batch(
    input_dir: &Path,
    output_dir: &Path,
    options: &ReportOptions,
) -> Result<BatchSummary, ExtractError> {
    let pdfs = list_pdfs(input_dir)?;
    if pdfs.is_empty() {
        return Err(ExtractError::NoPdfFiles(input_dir.to_path_buf()));
    }
    std::fs::create_dir_all(output_dir)?;

    let mut summary = BatchSummary::default();
    for pdf in pdfs {
        let output = output_path_for(output_dir, &pdf, options.kind());
        if output.exists() {
            info!(output = %output.display(), "skipping, output already exists");
            summary.existing.push(output);
            continue;
        }

        match options.convert(&pdf, &output) {
            Ok(rows) => {
                info!(output = %output.display(), rows, "written");
                summary.written.push(output);
            }
            Err(error) => {
                warn!(input = %pdf.display(), %error, "skipped");
                summary.skipped.push((pdf, error.to_string()));
            }
        }
    }

    Ok(summary)
}
