//! Post-run checks on a cleaned table.

use std::collections::{BTreeSet, HashSet};

use crate::{config::YEAR_COLUMN, dates, table::Table};

/// Invariant violations found in a cleaned table.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Violations {
    /// Row indices holding a missing value.
    pub missing: Vec<usize>,
    /// Row indices that repeat an earlier row.
    pub duplicates: Vec<usize>,
    /// Columns that should have been dropped but are present.
    pub leftover_columns: Vec<String>,
    /// Row indices whose `Year` is outside the allowed set.
    pub out_of_range_years: Vec<usize>,
}

impl Violations {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
            && self.duplicates.is_empty()
            && self.leftover_columns.is_empty()
            && self.out_of_range_years.is_empty()
    }
}

/// Check `table` for missing values, duplicate rows and columns from
/// `dropped`. When `years` is given, every row's `Year` must be in it.
pub fn check(table: &Table, dropped: &[String], years: Option<&BTreeSet<i32>>) -> Violations {
    let mut v = Violations {
        leftover_columns: dropped
            .iter()
            .filter(|c| table.headers.contains(*c))
            .cloned()
            .collect(),
        ..Default::default()
    };

    let mut seen = HashSet::with_capacity(table.len());
    for (idx, row) in table.rows.iter().enumerate() {
        if row.iter().any(Option::is_none) {
            v.missing.push(idx);
        }
        if !seen.insert(row) {
            v.duplicates.push(idx);
        }
    }

    if let Some(years) = years {
        match table.column_index(YEAR_COLUMN) {
            Ok(col) => {
                for (idx, row) in table.rows.iter().enumerate() {
                    let ok = row[col]
                        .as_deref()
                        .and_then(dates::parse_year)
                        .is_some_and(|y| years.contains(&y));
                    if !ok {
                        v.out_of_range_years.push(idx);
                    }
                }
            }
            Err(_) => v.out_of_range_years.extend(0..table.len()),
        }
    }
    v
}
