// src/export.rs
use arrow::{
    array::{ArrayRef, StringArray, TimestampMillisecondArray},
    datatypes::{DataType, Field, Schema, TimeUnit},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use prettytable::{format, Cell, Row};
use std::{
    io::{BufWriter, Write},
    path::Path,
    sync::Arc,
};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{
    config::{OutputFormat, DATE_COLUMN},
    dates,
    error::{CleanError, Result},
    table::Table,
};

/// Write `table` to `path`, replacing any existing file. The data goes to a
/// temporary file next to `path` first so a failed write leaves nothing behind.
pub fn write_table(table: &Table, path: &Path, fmt: OutputFormat) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let not_writable = |source: std::io::Error| CleanError::OutputNotWritable {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(not_writable)?;
    match fmt {
        OutputFormat::Csv => {
            let mut w = BufWriter::new(tmp.as_file_mut());
            table.write_csv(&mut w)?;
            w.flush()?;
        }
        OutputFormat::Parquet => write_parquet(table, tmp.as_file_mut())?,
    }
    tmp.persist(path).map_err(|e| not_writable(e.error))?;
    debug!(path = %path.display(), ?fmt, "persisted output");
    Ok(())
}

/// Arrow batch for `table`: `Date` as a millisecond timestamp, the rest as text.
pub fn to_record_batch(table: &Table) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(table.headers.len());
    let mut cols: Vec<ArrayRef> = Vec::with_capacity(table.headers.len());

    for (i, name) in table.headers.iter().enumerate() {
        if name == DATE_COLUMN {
            let values: Vec<Option<i64>> = table
                .rows
                .iter()
                .map(|r| {
                    r[i].as_deref()
                        .and_then(dates::parse_canonical)
                        .map(|ts| ts.and_utc().timestamp_millis())
                })
                .collect();
            fields.push(Field::new(
                name,
                DataType::Timestamp(TimeUnit::Millisecond, None),
                true,
            ));
            cols.push(Arc::new(TimestampMillisecondArray::from(values)));
        } else {
            let values: Vec<Option<&str>> = table.rows.iter().map(|r| r[i].as_deref()).collect();
            fields.push(Field::new(name, DataType::Utf8, true));
            cols.push(Arc::new(StringArray::from(values)));
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), cols).map_err(Into::into)
}

fn write_parquet<W: Write + Send>(table: &Table, out: W) -> Result<()> {
    let batch = to_record_batch(table)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(out, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// The first `n` rows as a printable table, with a leading row-number column.
pub fn preview(table: &Table, n: usize) -> prettytable::Table {
    let mut out = prettytable::Table::new();
    out.set_format(*format::consts::FORMAT_CLEAN);

    let mut header = vec![Cell::new("")];
    header.extend(table.headers.iter().map(|h| Cell::new(h).style_spec("b")));
    out.set_titles(Row::new(header));

    for (idx, row) in table.head(n).rows.iter().enumerate() {
        let mut cells = vec![Cell::new(&idx.to_string()).style_spec("r")];
        cells.extend(
            row.iter()
                .map(|c| Cell::new(c.as_deref().unwrap_or("NaN"))),
        );
        out.add_row(Row::new(cells));
    }
    out
}
