// src/clean.rs
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::{
    config::{CleanConfig, TemporalPolicy, DATE_COLUMN, YEAR_COLUMN},
    dates,
    error::{CleanError, Result},
    export,
    table::Table,
};

/// Row counts after each stage of a cleaning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub rows_read: usize,
    pub after_temporal: usize,
    pub after_dropna: usize,
    pub after_dedup: usize,
    pub dropped_columns: Vec<String>,
    pub columns: Vec<String>,
}

/// Parse every `Date` cell and rewrite it in the output format. Missing
/// cells stay missing; any other unparseable value fails the run.
fn parse_dates(table: &mut Table) -> Result<Vec<Option<NaiveDateTime>>> {
    let col = table.column_index(DATE_COLUMN)?;
    let mut stamps = Vec::with_capacity(table.len());
    for (idx, row) in table.rows.iter_mut().enumerate() {
        let ts = match row[col].as_deref() {
            None => None,
            Some(raw) => Some(dates::parse_incident_date(raw).ok_or_else(|| {
                CleanError::DateParse {
                    row: idx,
                    value: raw.to_string(),
                }
            })?),
        };
        if let Some(ts) = &ts {
            row[col] = Some(dates::format_timestamp(ts));
        }
        stamps.push(ts);
    }
    Ok(stamps)
}

fn apply_policy(
    table: &mut Table,
    stamps: Vec<Option<NaiveDateTime>>,
    policy: &TemporalPolicy,
    now: NaiveDateTime,
) -> Result<()> {
    match policy {
        TemporalPolicy::RelativeWindow { years } => {
            let cutoff = dates::years_before(now, *years);
            debug!(%cutoff, "relative window");
            let mut keep = stamps.into_iter().map(|ts| ts.is_some_and(|t| t >= cutoff));
            table.retain_rows(|_| keep.next().unwrap_or(false));
        }
        TemporalPolicy::FixedYears { years } => {
            let col = table.column_index(YEAR_COLUMN)?;
            debug!(?years, "fixed years");
            table.retain_rows(|row| {
                row[col]
                    .as_deref()
                    .and_then(dates::parse_year)
                    .is_some_and(|y| years.contains(&y))
            });
        }
    }
    Ok(())
}

/// Run the cleaning stages over an in-memory table:
/// parse dates, temporal filter, drop columns, drop missing, drop duplicates.
///
/// `now` anchors the relative window and is ignored by the fixed-year policy.
pub fn clean_table(
    mut table: Table,
    drop_columns: &[String],
    policy: &TemporalPolicy,
    now: NaiveDateTime,
) -> Result<(Table, CleanReport)> {
    let mut report = CleanReport {
        rows_read: table.len(),
        ..Default::default()
    };
    info!(rows = report.rows_read, "read");

    let stamps = parse_dates(&mut table)?;

    apply_policy(&mut table, stamps, policy, now)?;
    report.after_temporal = table.len();
    info!(rows = report.after_temporal, "after temporal filter");

    table.drop_columns(drop_columns)?;
    report.dropped_columns = drop_columns.to_vec();

    table.drop_missing();
    report.after_dropna = table.len();
    info!(rows = report.after_dropna, "after dropping missing values");

    table.drop_duplicates();
    report.after_dedup = table.len();
    info!(rows = report.after_dedup, "after dropping duplicates");

    report.columns = table.headers.clone();
    Ok((table, report))
}

/// Read `cfg.input`, clean it, and write the result to `cfg.output`.
/// `before_write` sees the cleaned table ahead of the export. Nothing is
/// written unless every stage succeeds.
#[tracing::instrument(level = "info", skip_all, fields(input = %cfg.input.display()))]
pub fn run<F>(cfg: &CleanConfig, now: NaiveDateTime, before_write: F) -> Result<(Table, CleanReport)>
where
    F: FnOnce(&Table),
{
    let table = Table::read_csv(&cfg.input)?;
    let (cleaned, report) = clean_table(table, &cfg.drop_columns, &cfg.policy, now)?;
    before_write(&cleaned);
    export::write_table(&cleaned, Path::new(&cfg.output), cfg.format)?;
    info!(output = %cfg.output.display(), rows = cleaned.len(), "exported");
    Ok((cleaned, report))
}
