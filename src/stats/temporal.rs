use crate::model::{CommitRecord, TemporalHistogram};
use chrono::{Datelike, TimeZone, Timelike};

/// Buckets commits by wall-clock hour, weekday (Monday = 0) and calendar day in `tz`.
pub fn temporal_histogram<Tz: TimeZone>(records: &[CommitRecord], tz: &Tz) -> TemporalHistogram {
    let mut hist = TemporalHistogram::default();
    for record in records {
        let local = record.timestamp.with_timezone(tz);
        hist.by_hour[local.hour() as usize] += 1;
        hist.by_weekday[local.weekday().num_days_from_monday() as usize] += 1;
        *hist.by_date.entry(local.date_naive()).or_insert(0) += 1;
    }
    hist
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, Utc};
    use std::collections::BTreeSet;

    fn record(hash: &str, secs: i64) -> CommitRecord {
        CommitRecord {
            hash: hash.to_string(),
            author_name: "Alice".to_string(),
            author_email: String::new(),
            timestamp: chrono::DateTime::from_timestamp(secs, 0).unwrap(),
            subject: String::new(),
            insertions: 0,
            deletions: 0,
            files: BTreeSet::new(),
        }
    }

    // 2024-01-01T09:30:00Z is a Monday.
    const MONDAY_0930: i64 = 1_704_101_400;

    #[test]
    fn buckets_by_hour_and_weekday_in_utc() {
        let records = vec![
            record("a", MONDAY_0930),
            record("b", MONDAY_0930 + 600),
            record("c", MONDAY_0930 + 86_400 + 3_600),
        ];
        let hist = temporal_histogram(&records, &Utc);
        assert_eq!(hist.by_hour[9], 2);
        assert_eq!(hist.by_hour[10], 1);
        assert_eq!(hist.by_weekday[0], 2);
        assert_eq!(hist.by_weekday[1], 1);
        assert_eq!(
            hist.by_date.get(&NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            Some(&2)
        );
    }

    #[test]
    fn offset_shifts_hour_and_day() {
        let records = vec![record("a", MONDAY_0930)];
        let tz = FixedOffset::west_opt(10 * 3600).unwrap();
        let hist = temporal_histogram(&records, &tz);
        assert_eq!(hist.by_hour[23], 1);
        // Sunday evening in UTC-10.
        assert_eq!(hist.by_weekday[6], 1);
    }

    #[test]
    fn sums_match_commit_count() {
        let records: Vec<_> = (0..50)
            .map(|i| record(&format!("h{i}"), MONDAY_0930 + i * 7_919))
            .collect();
        let hist = temporal_histogram(&records, &Utc);
        assert_eq!(hist.by_hour.iter().sum::<u32>(), 50);
        assert_eq!(hist.by_weekday.iter().sum::<u32>(), 50);
        assert_eq!(hist.by_date.values().sum::<u32>(), 50);
    }

    #[test]
    fn empty_input_has_zeroed_buckets() {
        let hist = temporal_histogram(&[], &Utc);
        assert!(hist.by_hour.iter().all(|&c| c == 0));
        assert!(hist.by_weekday.iter().all(|&c| c == 0));
        assert!(hist.by_date.is_empty());
    }
}
