use anyhow::{bail, Context, Result};
use clap::Parser;
use sheetwise_import::grid::csv::{read_csv, CsvGridOptions};
use sheetwise_import::{open_path, NormalizerConfig, Workbook, WorkbookNormalizer};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "sheetwise",
    version,
    about = "Normalize a finance workbook into transactions, installments and savings goals"
)]
struct Cli {
    /// Workbook to read (.xlsx, .xls, .ods, .csv, .tsv or sheet-keyed .json)
    file: PathBuf,

    /// TOML file with header tokens and leniency settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Field delimiter; reads the file as delimited text
    #[arg(long)]
    delimiter: Option<char>,

    /// Sheet name for delimited input (default: file stem)
    #[arg(long)]
    sheet_name: Option<String>,

    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => NormalizerConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => NormalizerConfig::default(),
    };

    let workbook = load_workbook(&cli).with_context(|| format!("Failed to read {}", cli.file.display()))?;
    let result = WorkbookNormalizer::new(config).normalize(&workbook)?;

    for skipped in &result.skipped {
        tracing::warn!(sheet = %skipped.sheet, row = skipped.row, "row skipped: {}", skipped.reason);
    }

    let json = if cli.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{json}");
    Ok(())
}

fn load_workbook(cli: &Cli) -> Result<Workbook> {
    if cli.delimiter.is_none() && cli.sheet_name.is_none() {
        return Ok(open_path(&cli.file)?);
    }
    if cli.delimiter.is_none() && !is_delimited(&cli.file) {
        bail!("--sheet-name only applies to delimited input");
    }

    let mut options = CsvGridOptions::for_path(&cli.file);
    if let Some(delimiter) = cli.delimiter {
        if !delimiter.is_ascii() {
            bail!("Delimiter must be a single ASCII character, got '{delimiter}'");
        }
        options.delimiter = delimiter as u8;
    }
    if let Some(name) = &cli.sheet_name {
        options.sheet_name = name.clone();
    }

    let sheet = read_csv(File::open(&cli.file)?, &options)?;
    Ok(Workbook::new(vec![sheet]))
}

fn is_delimited(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv") || e.eq_ignore_ascii_case("tsv"))
}
