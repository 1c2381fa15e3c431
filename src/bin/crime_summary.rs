use anyhow::{Context, Result};
use clap::Parser;
use crimeclean::{
    summary::{self, SummaryFilter},
    Table,
};
use prettytable::{format, Cell, Row};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "crime_summary")]
#[command(about = "Arrest, year, month, location and primary type counts for a cleaned CSV")]
struct Args {
    /// Cleaned CSV produced by `crimeclean`
    input: PathBuf,

    /// Also break this year down by month
    #[arg(long)]
    year: Option<i32>,

    /// How many locations to list
    #[arg(long, default_value_t = 5)]
    top: usize,

    /// Only count incidents of this primary type
    #[arg(long)]
    primary_type: Option<String>,
}

fn counts_table<K: ToString>(title: &str, rows: &[(K, usize)]) -> prettytable::Table {
    let mut table = prettytable::Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(vec![
        Cell::new(title).style_spec("bFg"),
        Cell::new("Count").style_spec("bFg"),
    ]));
    for (k, n) in rows {
        table.add_row(Row::new(vec![
            Cell::new(&k.to_string()),
            Cell::new(&n.to_string()).style_spec("r"),
        ]));
    }
    table
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let table = Table::read_csv(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    tracing::info!(rows = table.len(), "loaded cleaned table");

    let filter = SummaryFilter {
        primary_type: args.primary_type.clone(),
    };

    counts_table("Arrest", &summary::by_arrest(&table, &filter)?).printstd();
    counts_table("Year", &summary::by_year(&table, &filter)?).printstd();
    counts_table(
        "Location Description",
        &summary::top_locations(&table, args.top, &filter)?,
    )
    .printstd();

    if let Some(year) = args.year {
        println!("Crimes per month in {year}");
        counts_table("Month", &summary::by_month(&table, year, &filter)?).printstd();
    }

    if args.primary_type.is_none() {
        counts_table("Primary Type", &summary::by_primary_type(&table)?).printstd();
    }

    Ok(())
}
