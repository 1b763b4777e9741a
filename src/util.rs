use crate::error::{LensError, Result};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

/// Parses a point in time: RFC3339, `YYYY-MM-DD` (midnight UTC), epoch
/// seconds, or a relative phrase such as `3 days ago` counted back from
/// `reference`.
pub fn parse_instant(input: &str, reference: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&datetime));
        }
    }

    if let Ok(secs) = input.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| LensError::InvalidDate(format!("Timestamp out of range: {secs}")));
    }

    if let Some(duration) = parse_natural_duration(input) {
        return reference
            .checked_sub_signed(duration)
            .ok_or_else(|| LensError::InvalidDate(format!("Duration overflow for '{input}'")));
    }

    Err(LensError::InvalidDate(format!(
        "'{input}' is not RFC3339, YYYY-MM-DD, epoch seconds or 'N days ago'"
    )))
}

fn parse_natural_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();

    for (suffix, days_per_unit) in [(" days ago", 1), (" weeks ago", 7), (" months ago", 30)] {
        if let Some(n) = input.strip_suffix(suffix) {
            if let Ok(n) = n.trim().parse::<i64>() {
                return Duration::try_days(n.checked_mul(days_per_unit)?);
            }
        }
    }

    None
}
