use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use datev_pdf_to_csv::{
    BatchSummary, BwaOptions, ColumnLayout, ExtractionReport, PageSelection, ReportKind,
    ReportLabels, ReportOptions, SusaOptions, convert_batch, extract_bwa_to_csv,
    extract_susa_to_csv, load_structure_reference,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_INPUT_DIR: &str = "input";
const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_STRUCTURE: &str = "DATEV Struktur/BWA Export Datei -leer -.csv";

#[derive(Debug, Parser)]
#[command(
    name = "pdf2csv",
    version,
    about = "Convert DATEV BWA and SuSa PDF reports into CSV",
    after_help = "Without a subcommand every PDF in ./input is converted into ./output."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert the BWA development overview (13 month columns).
    Bwa(BwaArgs),
    /// Convert the Summen- und Saldenliste.
    Susa(SusaArgs),
}

#[derive(Debug, Args)]
struct IoArgs {
    /// Input PDF; with --batch a directory.
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Output CSV path in single-file mode.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Convert every PDF in the input directory.
    #[arg(long)]
    batch: bool,

    /// Input directory for --batch.
    #[arg(long, default_value = DEFAULT_INPUT_DIR)]
    input_dir: PathBuf,

    /// Output directory for --batch.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Output delimiter character.
    #[arg(long, default_value = ";")]
    delimiter: char,
}

#[derive(Debug, Args)]
struct BwaArgs {
    #[command(flatten)]
    io: IoArgs,

    /// 1-based page; searched for "Entwicklungsuebersicht" when omitted.
    #[arg(long)]
    page: Option<u32>,

    /// Structure CSV used to check the row count.
    #[arg(long)]
    structure: Option<PathBuf>,

    /// JSON file overriding the report label sets.
    #[arg(long)]
    labels: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SusaArgs {
    #[command(flatten)]
    io: IoArgs,

    /// 1-based first page (inclusive).
    #[arg(long)]
    start_page: Option<u32>,

    /// 1-based last page (inclusive).
    #[arg(long)]
    end_page: Option<u32>,

    /// Page range like 3-7; alternative to --start-page/--end-page.
    #[arg(long, conflicts_with_all = ["start_page", "end_page"])]
    pages: Option<String>,

    /// JSON file with the column layout.
    #[arg(long)]
    layout: Option<PathBuf>,
}

fn parse_delimiter(delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character");
    }
    Ok(delimiter as u8)
}

fn find_default_pdf(input_dir: &Path, kind: ReportKind) -> Result<PathBuf> {
    let mut candidates = std::fs::read_dir(input_dir)
        .with_context(|| format!("failed to read '{}'", input_dir.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect::<Vec<_>>();
    candidates.sort();

    let preferred = (kind == ReportKind::Bwa)
        .then(|| {
            candidates.iter().find(|path| {
                path.file_stem()
                    .is_some_and(|stem| stem.to_string_lossy().to_lowercase().contains("bwa"))
            })
        })
        .flatten();
    preferred
        .or_else(|| candidates.first())
        .cloned()
        .with_context(|| format!("no PDF given and none found in '{}'", input_dir.display()))
}

fn bwa_options(args: &BwaArgs) -> Result<BwaOptions> {
    let labels = args
        .labels
        .as_deref()
        .map(ReportLabels::from_json_path)
        .transpose()
        .context("failed to load --labels")?
        .unwrap_or_default();

    let structure_path = args.structure.clone().or_else(|| {
        let fallback = PathBuf::from(DEFAULT_STRUCTURE);
        fallback.exists().then_some(fallback)
    });
    let structure = structure_path
        .map(|path| {
            load_structure_reference(&path)
                .with_context(|| format!("failed to load structure '{}'", path.display()))
        })
        .transpose()?;

    Ok(BwaOptions {
        page: args.page,
        labels,
        structure,
        delimiter: parse_delimiter(args.io.delimiter)?,
    })
}

fn susa_options(args: &SusaArgs) -> Result<SusaOptions> {
    let layout = args
        .layout
        .as_deref()
        .map(ColumnLayout::from_json_path)
        .transpose()
        .context("failed to load --layout")?
        .unwrap_or_default();

    let pages = match args.pages.as_deref() {
        Some(range) => range
            .parse::<PageSelection>()
            .map_err(|error| anyhow::anyhow!("invalid --pages: {error}"))?,
        None => PageSelection::range(args.start_page, args.end_page),
    };

    Ok(SusaOptions {
        pages,
        layout,
        delimiter: parse_delimiter(args.io.delimiter)?,
    })
}

fn log_report(output: &Path, report: &ExtractionReport) {
    println!("written: {} ({} rows)", output.display(), report.row_count);
    if !report.warnings.is_empty() {
        eprintln!("warning: {} issue(s) detected", report.warnings.len());
        for warning in &report.warnings {
            eprintln!(
                "  - {:?} page={:?} column={:?}: {}",
                warning.code, warning.page, warning.column, warning.message
            );
        }
    }
}

/// Returns whether every document was converted or already present.
fn log_summary(summary: &BatchSummary) -> bool {
    for path in &summary.written {
        println!("written: {}", path.display());
    }
    for (path, reason) in &summary.skipped {
        eprintln!("skipped: {} ({reason})", path.display());
    }
    println!(
        "{} written, {} already present, {} skipped",
        summary.written.len(),
        summary.existing.len(),
        summary.skipped.len()
    );

    summary.skipped.is_empty()
}

fn batch_exit_code(clean: bool) -> ExitCode {
    if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

fn run_batch(io: &IoArgs, options: &ReportOptions) -> Result<ExitCode> {
    let input_dir = match &io.pdf {
        Some(path) if path.is_dir() => path.clone(),
        Some(path) => bail!(
            "--batch expects a directory, but --pdf points to '{}'",
            path.display()
        ),
        None => io.input_dir.clone(),
    };
    if !input_dir.exists() {
        bail!("input directory not found: '{}'", input_dir.display());
    }

    let summary = convert_batch(&input_dir, &io.output_dir, options)
        .with_context(|| format!("batch conversion of '{}' failed", input_dir.display()))?;
    Ok(batch_exit_code(log_summary(&summary)))
}

fn single_paths(io: &IoArgs, kind: ReportKind) -> Result<(PathBuf, PathBuf)> {
    let pdf = match &io.pdf {
        Some(pdf) => pdf.clone(),
        None => find_default_pdf(&io.input_dir, kind)?,
    };
    if !pdf.exists() {
        bail!("PDF not found: '{}'", pdf.display());
    }
    let out = io
        .out
        .clone()
        .unwrap_or_else(|| {
            Path::new(DEFAULT_OUTPUT_DIR).join(format!("{}.csv", kind.file_suffix()))
        });
    Ok((pdf, out))
}

fn run_bwa(args: &BwaArgs) -> Result<ExitCode> {
    let options = bwa_options(args)?;
    if args.io.batch {
        return run_batch(&args.io, &ReportOptions::Bwa(options));
    }

    let (pdf, out) = single_paths(&args.io, ReportKind::Bwa)?;
    let report = extract_bwa_to_csv(&pdf, &out, &options)
        .with_context(|| format!("failed to convert '{}'", pdf.display()))?;
    log_report(&out, &report);
    Ok(ExitCode::SUCCESS)
}

fn run_susa(args: &SusaArgs) -> Result<ExitCode> {
    let options = susa_options(args)?;
    if args.io.batch {
        return run_batch(&args.io, &ReportOptions::Susa(options));
    }

    let (pdf, out) = single_paths(&args.io, ReportKind::Susa)?;
    let report = extract_susa_to_csv(&pdf, &out, &options)
        .with_context(|| format!("failed to convert '{}'", pdf.display()))?;
    log_report(&out, &report);
    Ok(ExitCode::SUCCESS)
}

fn run_default_batch() -> Result<ExitCode> {
    let input_dir = Path::new(DEFAULT_INPUT_DIR);
    let output_dir = Path::new(DEFAULT_OUTPUT_DIR);
    let bwa = bwa_options(&BwaArgs {
        io: IoArgs {
            pdf: None,
            out: None,
            batch: true,
            input_dir: input_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            delimiter: ';',
        },
        page: None,
        structure: None,
        labels: None,
    })?;

    let mut clean = true;
    for options in [ReportOptions::Bwa(bwa), ReportOptions::Susa(SusaOptions::default())] {
        let summary = convert_batch(input_dir, output_dir, &options)
            .with_context(|| format!("batch conversion of '{}' failed", input_dir.display()))?;
        clean &= log_summary(&summary);
    }
    Ok(batch_exit_code(clean))
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("datev_pdf_to_csv=info,pdf2csv=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Some(Commands::Bwa(args)) => run_bwa(args),
        Some(Commands::Susa(args)) => run_susa(args),
        None => run_default_batch(),
    };

    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
