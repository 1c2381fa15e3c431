use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, ValueEnum};
use crimeclean::{
    clean,
    config::{CleanConfig, OutputFormat, TemporalPolicy},
    export,
};
use std::{fs, path::PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Keep incidents from the last N years
    Relative,
    /// Keep incidents whose Year is in the given list
    Years,
}

#[derive(Parser)]
#[command(
    name = "crimeclean",
    version,
    about = "Filter, trim and de-duplicate a crime incident CSV export"
)]
struct Args {
    /// Input CSV (default: crime.csv)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file, replaced if it exists (default: cleaned_crime_data.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Temporal filter to apply
    #[arg(long, value_enum)]
    policy: Option<Policy>,

    /// Window length for the relative policy; implies `--policy relative`
    #[arg(long, conflicts_with = "years")]
    years_back: Option<u32>,

    /// Years kept by the fixed-year policy; implies `--policy years`
    #[arg(long, value_delimiter = ',')]
    years: Option<Vec<i32>>,

    /// Anchor the relative window at this date instead of now (YYYY-MM-DD)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Rows to print after cleaning
    #[arg(long)]
    preview: Option<usize>,

    /// YAML config file; flags given on the command line win
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write stage row counts as JSON
    #[arg(long)]
    report: Option<PathBuf>,
}

/// Merge the policy flags into the policy loaded from config. The policy
/// kind is switched only when a flag asks for a different one, so values
/// from the config file survive flags that do not touch them.
fn resolve_policy(
    current: TemporalPolicy,
    policy: Option<Policy>,
    years_back: Option<u32>,
    years: Option<Vec<i32>>,
) -> Result<TemporalPolicy> {
    let wanted = match (policy, &years, years_back) {
        (Some(Policy::Relative), Some(_), _) => bail!("--years needs --policy years"),
        (Some(Policy::Years), _, Some(_)) => bail!("--years-back needs --policy relative"),
        (Some(p), _, _) => Some(p),
        (None, Some(_), _) => Some(Policy::Years),
        (None, None, Some(_)) => Some(Policy::Relative),
        (None, None, None) => None,
    };

    let mut resolved = match (wanted, current) {
        (Some(Policy::Relative), p @ TemporalPolicy::RelativeWindow { .. }) => p,
        (Some(Policy::Relative), TemporalPolicy::FixedYears { .. }) => TemporalPolicy::default(),
        (Some(Policy::Years), p @ TemporalPolicy::FixedYears { .. }) => p,
        (Some(Policy::Years), TemporalPolicy::RelativeWindow { .. }) => {
            TemporalPolicy::fixed_default()
        }
        (None, p) => p,
    };

    match &mut resolved {
        TemporalPolicy::RelativeWindow { years } => {
            if let Some(n) = years_back {
                *years = n;
            }
        }
        TemporalPolicy::FixedYears { years: set } => {
            if let Some(list) = years {
                *set = list.into_iter().collect();
            }
        }
    }
    Ok(resolved)
}

impl Args {
    fn into_config(self) -> Result<(CleanConfig, Option<PathBuf>, Option<NaiveDate>)> {
        let mut cfg = match &self.config {
            Some(p) => CleanConfig::from_yaml_file(p)?,
            None => CleanConfig::default(),
        };
        if let Some(p) = self.input {
            cfg.input = p;
        }
        if let Some(p) = self.output {
            cfg.output = p;
        }
        if let Some(f) = self.format {
            cfg.format = f;
        }
        if let Some(n) = self.preview {
            cfg.preview_rows = n;
        }
        cfg.policy = resolve_policy(cfg.policy, self.policy, self.years_back, self.years)?;
        Ok((cfg, self.report, self.as_of))
    }
}

fn main() -> Result<()> {
    // logs go to stderr; stdout carries the preview and the confirmation line
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let (cfg, report_path, as_of) = Args::parse().into_config()?;
    let now: NaiveDateTime = match as_of {
        Some(d) => d.and_time(chrono::NaiveTime::MIN),
        None => Local::now().naive_local(),
    };
    info!(policy = ?cfg.policy, %now, "starting");

    let preview_rows = cfg.preview_rows;
    let (_, report) = match clean::run(&cfg, now, |cleaned| {
        export::preview(cleaned, preview_rows).printstd();
    }) {
        Ok(done) => done,
        Err(e) => {
            if e.is_schema_mismatch() {
                error!(input = %cfg.input.display(), "input does not match the incident export layout");
            }
            return Err(e).with_context(|| format!("cleaning {}", cfg.input.display()));
        }
    };

    println!("DataFrame successfully exported to: {}", cfg.output.display());

    if let Some(p) = report_path {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(&p, json).with_context(|| format!("writing report {}", p.display()))?;
        info!(path = %p.display(), "wrote report");
    }
    Ok(())
}
