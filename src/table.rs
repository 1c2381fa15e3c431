// src/table.rs
use csv::{ReaderBuilder, WriterBuilder};
use once_cell::sync::Lazy;
use std::{
    collections::HashSet,
    fs::File,
    io::{Read, Write},
    path::Path,
};
use tracing::{debug, warn};

use crate::error::{CleanError, Result};

/// Field values read as missing, matching the default NA set of the usual
/// dataframe CSV readers.
static NA_VALUES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
        "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
    ]
    .into_iter()
    .collect()
});

/// Returns true when `field` is one of the recognised missing-value tokens.
pub fn is_na(field: &str) -> bool {
    NA_VALUES.contains(field)
}

/// An in-memory table: the header row plus every data row, in file order.
/// A `None` cell is a missing value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Open `path` and parse it as a CSV file with a header row.
    #[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CleanError::InputNotFound(path.to_path_buf()),
            _ => CleanError::Io(e),
        })?;
        let table = Self::from_reader(file)?;
        debug!(
            rows = table.len(),
            columns = table.headers.len(),
            "loaded table"
        );
        Ok(table)
    }

    /// Parse CSV text from any reader. Short rows are padded with missing
    /// values; rows longer than the header are rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let width = headers.len();
        let mut table = Table::new(headers);

        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            if record.len() > width {
                return Err(CleanError::RaggedRow {
                    row: idx,
                    expected: width,
                    found: record.len(),
                });
            }
            if record.len() < width {
                warn!(row = idx, found = record.len(), width, "short row padded");
            }
            let mut row: Vec<Option<String>> = record
                .iter()
                .map(|f| (!is_na(f)).then(|| f.to_string()))
                .collect();
            row.resize(width, None);
            table.rows.push(row);
        }

        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `name` in the header.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| CleanError::MissingColumn(name.to_string()))
    }

    /// Remove the named columns. Every name must exist; nothing is removed
    /// if one is absent. Order of the remaining columns is preserved.
    pub fn drop_columns<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let mut doomed = HashSet::with_capacity(names.len());
        for name in names {
            doomed.insert(self.column_index(name.as_ref())?);
        }

        let keep: Vec<usize> = (0..self.headers.len())
            .filter(|i| !doomed.contains(i))
            .collect();

        self.headers = keep.iter().map(|&i| self.headers[i].clone()).collect();
        for row in &mut self.rows {
            let mut old = std::mem::take(row);
            *row = keep.iter().map(|&i| old[i].take()).collect();
        }
        Ok(())
    }

    /// Keep only the rows for which `pred` returns true.
    pub fn retain_rows<F>(&mut self, mut pred: F)
    where
        F: FnMut(&[Option<String>]) -> bool,
    {
        self.rows.retain(|row| pred(row));
    }

    /// Drop every row holding a missing value in any column.
    pub fn drop_missing(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| row.iter().all(Option::is_some));
        before - self.rows.len()
    }

    /// Drop rows identical to an earlier row, keeping the first occurrence.
    pub fn drop_duplicates(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row.clone()));
        before - self.rows.len()
    }

    /// A copy holding only the first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Write header and rows as CSV. Missing values become empty fields.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
        }
        wtr.flush()?;
        Ok(())
    }
}
