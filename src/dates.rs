use chrono::{Datelike, Months, NaiveDateTime};

/// Format of the `Date` column in the raw incident export.
pub const INPUT_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Format timestamps are written back out in.
pub const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse `"MM/DD/YYYY hh:mm:ss AM"` into a naive timestamp.
pub fn parse_incident_date(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), INPUT_FORMAT).ok()
}

/// Parse a timestamp previously rendered with [`format_timestamp`].
pub fn parse_canonical(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), OUTPUT_FORMAT).ok()
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(OUTPUT_FORMAT).to_string()
}

/// `now` moved back by whole calendar years. A Feb 29 anchor lands on
/// Feb 28 when the target year is not a leap year.
pub fn years_before(now: NaiveDateTime, years: u32) -> NaiveDateTime {
    now.checked_sub_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Read a `Year` cell as an integer; accepts `"2016"` and `"2016.0"`.
pub fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    let f: f64 = s.parse().ok()?;
    (f.fract() == 0.0 && f.abs() < i32::MAX as f64).then_some(f as i32)
}

/// Calendar year and month of a rendered timestamp.
pub fn year_month(s: &str) -> Option<(i32, u32)> {
    parse_canonical(s).map(|ts| (ts.year(), ts.month()))
}
