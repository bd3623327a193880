//! CLI tool for exporting spreadsheet workbooks as JSON tables.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sheetjson::{ConverterBuilder, OutputLayout};
use std::path::PathBuf;

/// Export the tables of a workbook (.xls, .xlsx, .xlsb, .ods) as JSON.
#[derive(Parser, Debug)]
#[command(name = "sheetjson")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input workbook
    input: PathBuf,

    /// Output layout
    #[arg(short, long, value_enum, default_value_t = Layout::PerSheet)]
    layout: Layout,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Layout {
    /// One file per worksheet
    PerSheet,
    /// One file per workbook
    Workbook,
}

impl From<Layout> for OutputLayout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::PerSheet => OutputLayout::PerSheet,
            Layout::Workbook => OutputLayout::Workbook,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut builder = ConverterBuilder::new()
        .with_layout(args.layout.into())
        .with_pretty(args.pretty);
    if let Some(dir) = &args.output {
        builder = builder.with_output_dir(dir);
    }
    let converter = builder.build().context("Invalid configuration")?;

    log::debug!("Processing: {}", args.input.display());
    let written = converter
        .convert_path(&args.input)
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    for path in &written {
        log::debug!("Written to: {}", path.display());
    }

    Ok(())
}
