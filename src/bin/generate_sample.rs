use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use sheet_charts::data::sample::sample_workbook;
use sheet_charts::data::spreadsheet::write_sheets;

/// Write a three-sheet workbook of random sample data: normally distributed
/// numeric columns on `Sheet1`, mixed numeric/categorical columns on
/// `Sheet2` and `Sheet3`.
#[derive(Debug, Parser)]
#[command(name = "generate_sample", version)]
struct Args {
    /// Output workbook (.xlsx).
    #[arg(short, long, default_value = "tester-excel-sheet.xlsx")]
    output: PathBuf,

    /// Rows per sheet.
    #[arg(short, long, default_value_t = 100)]
    rows: usize,

    /// Seed for repeatable output. Seeded from the OS when absent.
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let sheets = sample_workbook(&mut rng, args.rows).context("building sample datasets")?;
    write_sheets(&args.output, &sheets)
        .with_context(|| format!("writing {}", args.output.display()))?;

    let file_name = args
        .output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    println!("Data successfully written to {file_name}!");
    Ok(())
}
