//! Run configuration. The defaults reproduce the fixed constants of the
//! original cleaning script; a YAML file can override any of them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fs, path::Path, path::PathBuf};

pub const DEFAULT_INPUT: &str = "crime.csv";
pub const DEFAULT_OUTPUT: &str = "cleaned_crime_data.csv";
pub const DEFAULT_YEARS_BACK: u32 = 3;
pub const DEFAULT_YEARS: [i32; 3] = [2015, 2016, 2017];
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Columns removed from every incident record.
pub const DROP_COLUMNS: [&str; 10] = [
    "Case Number",
    "IUCR",
    "Updated On",
    "Location",
    "District",
    "FBI Code",
    "Community Area",
    "Domestic",
    "Beat",
    "Ward",
];

pub const DATE_COLUMN: &str = "Date";
pub const YEAR_COLUMN: &str = "Year";

/// Which rows survive the temporal filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemporalPolicy {
    /// `Date >= now - years`.
    RelativeWindow { years: u32 },
    /// `Year` is one of the listed calendar years.
    FixedYears { years: BTreeSet<i32> },
}

impl Default for TemporalPolicy {
    fn default() -> Self {
        TemporalPolicy::RelativeWindow {
            years: DEFAULT_YEARS_BACK,
        }
    }
}

impl TemporalPolicy {
    pub fn fixed_default() -> Self {
        TemporalPolicy::FixedYears {
            years: DEFAULT_YEARS.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub drop_columns: Vec<String>,
    pub policy: TemporalPolicy,
    pub format: OutputFormat,
    pub preview_rows: usize,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            drop_columns: DROP_COLUMNS.iter().map(|s| s.to_string()).collect(),
            policy: TemporalPolicy::default(),
            format: OutputFormat::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl CleanConfig {
    /// Load a YAML config file; missing keys take their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing config {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_script_constants() {
        let cfg = CleanConfig::default();
        assert_eq!(cfg.input, PathBuf::from("crime.csv"));
        assert_eq!(cfg.output, PathBuf::from("cleaned_crime_data.csv"));
        assert_eq!(cfg.drop_columns.len(), 10);
        assert_eq!(cfg.policy, TemporalPolicy::RelativeWindow { years: 3 });
        assert_eq!(cfg.preview_rows, 10);
        assert_eq!(cfg.format, OutputFormat::Csv);
    }

    #[test]
    fn yaml_overrides_only_given_keys() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(
            tmp,
            "input: data/crime.csv\npolicy:\n  kind: fixed_years\n  years: [2015, 2016, 2017]\nformat: parquet"
        )?;
        let cfg = CleanConfig::from_yaml_file(tmp.path())?;
        assert_eq!(cfg.input, PathBuf::from("data/crime.csv"));
        assert_eq!(cfg.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(cfg.policy, TemporalPolicy::fixed_default());
        assert_eq!(cfg.format, OutputFormat::Parquet);
        Ok(())
    }
}
