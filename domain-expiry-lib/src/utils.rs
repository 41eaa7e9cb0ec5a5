//! Utility functions for domain list parsing and expiry arithmetic.

use crate::error::DomainExpiryError;
use chrono::{DateTime, Datelike, Utc};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Split the configured comma-separated domain list.
///
/// Entries are trimmed. Order is preserved and nothing is dropped, so every
/// entry gets its own row; an empty entry is looked up like any other and
/// degrades to a placeholder row.
///
/// # Errors
///
/// Returns a configuration error if the list is missing.
pub fn parse_domain_list(raw: Option<&str>) -> Result<Vec<String>, DomainExpiryError> {
    let raw = raw.ok_or_else(|| DomainExpiryError::config("DOMAIN_NAMES is not set"))?;

    Ok(raw.split(',').map(|s| s.trim().to_string()).collect())
}

/// Convert an `expires` JSON value (Unix seconds) to a UTC timestamp.
///
/// Zero, non-numeric and out-of-range values yield `None`.
pub fn expiry_from_unix_seconds(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    let millis = if let Some(secs) = value.as_i64() {
        secs.checked_mul(1000)?
    } else {
        let secs = value.as_f64()?;
        let millis = (secs * 1000.0).trunc();
        if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
            return None;
        }
        millis as i64
    };

    if millis == 0 {
        return None;
    }

    DateTime::from_timestamp_millis(millis)
}

/// Whole days from `now` until `expiry`, rounded up.
///
/// An expiry exactly N days away yields N; a past expiry yields a negative
/// number (or zero within the last day).
pub fn remaining_days(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let diff = (expiry - now).num_milliseconds();
    let days = diff.div_euclid(MILLIS_PER_DAY);
    if diff.rem_euclid(MILLIS_PER_DAY) == 0 {
        days
    } else {
        days + 1
    }
}

/// Format a date as `YYYY.M.D` without zero padding.
pub fn format_expiry_date(expiry: DateTime<Utc>) -> String {
    format!("{}.{}.{}", expiry.year(), expiry.month(), expiry.day())
}
