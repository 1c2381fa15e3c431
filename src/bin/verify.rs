// src/bin/verify.rs

use anyhow::{bail, Context, Result};
use clap::Parser;
use crimeclean::{
    config::{DEFAULT_INPUT, DEFAULT_OUTPUT, DROP_COLUMNS},
    verify, Table,
};
use std::{collections::BTreeSet, path::PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "verify")]
#[command(about = "Check a cleaned incident CSV against its source")]
struct Args {
    /// Raw input CSV
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Cleaned CSV to check
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Require every row's Year to be one of these
    #[arg(long, value_delimiter = ',')]
    years: Option<Vec<i32>>,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let raw = Table::read_csv(&args.input)
        .with_context(|| format!("Failed to read input '{}'", args.input.display()))?;
    let cleaned = Table::read_csv(&args.output)
        .with_context(|| format!("Failed to read output '{}'", args.output.display()))?;

    let dropped: Vec<String> = DROP_COLUMNS.iter().map(|s| s.to_string()).collect();
    let years: Option<BTreeSet<i32>> = args.years.map(|y| y.into_iter().collect());
    let v = verify::check(&cleaned, &dropped, years.as_ref());
    info!(input = raw.len(), output = cleaned.len(), "loaded tables");

    let delta = cleaned.len() as isize - raw.len() as isize;
    println!("\n{: <25} {:>15} {:>15}", "File", "Rows", "Delta vs input");
    println!("{:-<57}", "");
    println!("{: <25} {:>15} {:>15}", "input", raw.len(), 0);
    println!("{: <25} {:>15} {:>15}", "output", cleaned.len(), delta);
    println!();
    println!("{: <25} {:>15}", "rows with missing", v.missing.len());
    println!("{: <25} {:>15}", "duplicate rows", v.duplicates.len());
    println!("{: <25} {:>15}", "leftover columns", v.leftover_columns.len());
    println!("{: <25} {:>15}", "rows out of year range", v.out_of_range_years.len());

    if !v.is_clean() {
        warn!(?v, "violations found");
        bail!("{} failed verification", args.output.display());
    }
    Ok(())
}
