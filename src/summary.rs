//! Rollups over a cleaned incident table: arrest outcomes, counts by year,
//! by month within a year, top locations, and by primary type.

use std::collections::{BTreeMap, HashMap};

use crate::{
    config::DATE_COLUMN,
    dates,
    error::Result,
    table::Table,
};

pub const PRIMARY_TYPE_COLUMN: &str = "Primary Type";
pub const ARREST_COLUMN: &str = "Arrest";
pub const LOCATION_DESCRIPTION_COLUMN: &str = "Location Description";

/// Narrows a rollup to one `Primary Type`; `None` counts every incident.
#[derive(Debug, Clone, Default)]
pub struct SummaryFilter {
    pub primary_type: Option<String>,
}

impl SummaryFilter {
    fn rows<'a>(
        &'a self,
        table: &'a Table,
    ) -> Result<impl Iterator<Item = &'a Vec<Option<String>>> + 'a> {
        let col = match self.primary_type {
            Some(_) => Some(table.column_index(PRIMARY_TYPE_COLUMN)?),
            None => None,
        };
        Ok(table.rows.iter().filter(move |row| match (col, &self.primary_type) {
            (Some(c), Some(want)) => row[c].as_deref() == Some(want.as_str()),
            _ => true,
        }))
    }
}

/// Count rows by the text of column `col`, most frequent first; ties sorted
/// by value.
fn count_values<'a, I>(rows: I, col: usize) -> Vec<(String, usize)>
where
    I: Iterator<Item = &'a Vec<Option<String>>>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        if let Some(v) = row[col].as_deref() {
            *counts.entry(v).or_default() += 1;
        }
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Incidents per `Arrest` value (`true` / `false`), most frequent first.
pub fn by_arrest(table: &Table, filter: &SummaryFilter) -> Result<Vec<(String, usize)>> {
    let col = table.column_index(ARREST_COLUMN)?;
    Ok(count_values(filter.rows(table)?, col))
}

/// The `n` most frequent `Location Description` values.
pub fn top_locations(
    table: &Table,
    n: usize,
    filter: &SummaryFilter,
) -> Result<Vec<(String, usize)>> {
    let col = table.column_index(LOCATION_DESCRIPTION_COLUMN)?;
    let mut out = count_values(filter.rows(table)?, col);
    out.truncate(n);
    Ok(out)
}

/// Incidents per calendar year, ascending.
pub fn by_year(table: &Table, filter: &SummaryFilter) -> Result<Vec<(i32, usize)>> {
    let date = table.column_index(DATE_COLUMN)?;
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for row in filter.rows(table)? {
        if let Some((y, _)) = row[date].as_deref().and_then(dates::year_month) {
            *counts.entry(y).or_default() += 1;
        }
    }
    Ok(counts.into_iter().collect())
}

/// Incidents per month (1..=12) within `year`. Months with no incidents are
/// reported as zero.
pub fn by_month(table: &Table, year: i32, filter: &SummaryFilter) -> Result<Vec<(u32, usize)>> {
    let date = table.column_index(DATE_COLUMN)?;
    let mut counts = [0usize; 12];
    for row in filter.rows(table)? {
        match row[date].as_deref().and_then(dates::year_month) {
            Some((y, m)) if y == year => counts[(m - 1) as usize] += 1,
            _ => {}
        }
    }
    Ok((1..=12).zip(counts).collect())
}

/// Incidents per primary type, most frequent first; ties sorted by name.
pub fn by_primary_type(table: &Table) -> Result<Vec<(String, usize)>> {
    let col = table.column_index(PRIMARY_TYPE_COLUMN)?;
    Ok(count_values(table.rows.iter(), col))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> Table {
        let csv = "ID,Date,Primary Type\n\
                   1,2016-01-02 15:15:00,THEFT\n\
                   2,2016-01-09 10:00:00,BATTERY\n\
                   3,2016-03-01 00:00:00,THEFT\n\
                   4,2017-07-04 23:00:00,THEFT\n\
                   5,2017-07-05 01:00:00,ASSAULT\n";
        Table::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn yearly_counts() {
        let all = by_year(&t(), &SummaryFilter::default()).unwrap();
        assert_eq!(all, vec![(2016, 3), (2017, 2)]);

        let theft = SummaryFilter {
            primary_type: Some("THEFT".into()),
        };
        assert_eq!(by_year(&t(), &theft).unwrap(), vec![(2016, 2), (2017, 1)]);
    }

    #[test]
    fn monthly_counts_fill_zeroes() {
        let m = by_month(&t(), 2016, &SummaryFilter::default()).unwrap();
        assert_eq!(m.len(), 12);
        assert_eq!(m[0], (1, 2));
        assert_eq!(m[1], (2, 0));
        assert_eq!(m[2], (3, 1));
        assert_eq!(m.iter().map(|(_, c)| c).sum::<usize>(), 3);
    }

    #[test]
    fn type_counts_sorted() {
        assert_eq!(
            by_primary_type(&t()).unwrap(),
            vec![
                ("THEFT".to_string(), 3),
                ("ASSAULT".to_string(), 1),
                ("BATTERY".to_string(), 1)
            ]
        );
    }

    fn incidents() -> Table {
        let csv = "ID,Date,Primary Type,Location Description,Arrest\n\
                   1,2016-01-02 15:15:00,THEFT,STREET,false\n\
                   2,2016-01-09 10:00:00,BATTERY,RESIDENCE,true\n\
                   3,2016-03-01 00:00:00,THEFT,STREET,true\n\
                   4,2017-07-04 23:00:00,THEFT,SIDEWALK,false\n\
                   5,2017-07-05 01:00:00,ASSAULT,APARTMENT,false\n\
                   6,2017-08-01 12:00:00,THEFT,ALLEY,false\n\
                   7,2017-09-01 12:00:00,THEFT,PARKING LOT,false\n\
                   8,2017-10-01 12:00:00,BATTERY,RESIDENCE,false\n";
        Table::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn arrest_counts_with_and_without_type() {
        let all = by_arrest(&incidents(), &SummaryFilter::default()).unwrap();
        assert_eq!(all, vec![("false".to_string(), 6), ("true".to_string(), 2)]);

        let battery = SummaryFilter {
            primary_type: Some("BATTERY".into()),
        };
        assert_eq!(
            by_arrest(&incidents(), &battery).unwrap(),
            vec![("false".to_string(), 1), ("true".to_string(), 1)]
        );
    }

    #[test]
    fn top_locations_keeps_n_most_frequent() {
        let top = top_locations(&incidents(), 5, &SummaryFilter::default()).unwrap();
        assert_eq!(top.len(), 5);
        assert_eq!(top[0], ("RESIDENCE".to_string(), 2));
        assert_eq!(top[1], ("STREET".to_string(), 2));
        // ties past the head are alphabetical, SIDEWALK falls off
        assert_eq!(top[2], ("ALLEY".to_string(), 1));
        assert_eq!(top[4], ("PARKING LOT".to_string(), 1));

        let theft = SummaryFilter {
            primary_type: Some("THEFT".into()),
        };
        let top = top_locations(&incidents(), 2, &theft).unwrap();
        assert_eq!(
            top,
            vec![("STREET".to_string(), 2), ("ALLEY".to_string(), 1)]
        );
    }

    #[test]
    fn missing_column_is_error() {
        let no_type = Table::from_reader("ID,Date\n1,2016-01-02 15:15:00\n".as_bytes()).unwrap();
        assert!(by_primary_type(&no_type).is_err());
        let filter = SummaryFilter {
            primary_type: Some("THEFT".into()),
        };
        assert!(by_year(&no_type, &filter).is_err());
        assert!(by_arrest(&no_type, &SummaryFilter::default()).is_err());
        assert!(top_locations(&no_type, 5, &SummaryFilter::default()).is_err());
    }
}
