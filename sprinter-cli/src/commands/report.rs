//! Shared output helpers

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use sprinter_core::RepoError;

/// Print per-repository errors after a warning banner. Successful data is
/// printed before this and is never suppressed.
pub fn print_errors(errors: &[RepoError]) {
    if errors.is_empty() {
        return;
    }

    eprintln!();
    eprintln!("WARNING: {} error(s) while talking to GitHub:", errors.len());
    for error in errors {
        eprintln!("  {}: {}", error.repo(), error);
    }
}

/// Bucket items by a string key, keeping first-seen order within a bucket
pub fn group_by<T>(items: &[T], key: impl Fn(&T) -> String) -> BTreeMap<String, Vec<&T>> {
    let mut groups: BTreeMap<String, Vec<&T>> = BTreeMap::new();
    for item in items {
        groups.entry(key(item)).or_default().push(item);
    }
    groups
}

/// Parse a due date given as `YYYY-MM-DD` (midnight UTC) or RFC 3339
pub fn parse_due_date(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| format!("Invalid date: {}", value));
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid date {:?}: {} (expected YYYY-MM-DD)", value, e))
}

pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "no due date".to_string())
}
