use crate::filter::AuthorMatch;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const SCHEMA_VERSION: u32 = 1;

pub const SECONDS_PER_DAY: i64 = 86_400;

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    pub timestamp: DateTime<Utc>,
    pub subject: String,
    pub insertions: u64,
    pub deletions: u64,
    pub files: BTreeSet<String>,
}

impl CommitRecord {
    pub fn lines_changed(&self) -> u64 {
        self.insertions.saturating_add(self.deletions)
    }
}

/// Time window ending at `now`. `days = 0` covers the last 24 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub now: DateTime<Utc>,
    pub days: u32,
}

impl Window {
    pub fn new(now: DateTime<Utc>, days: u32) -> Self {
        Self { now, days }
    }

    /// Number of days the window spans, never less than one.
    pub fn span_days(&self) -> u32 {
        self.days.max(1)
    }

    /// Inclusive lower edge, saturating at the earliest representable instant.
    pub fn start(&self) -> DateTime<Utc> {
        self.now
            .checked_sub_signed(Duration::seconds(self.span_days() as i64 * SECONDS_PER_DAY))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        timestamp >= &self.start() && timestamp <= &self.now
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorStats {
    pub name: String,
    pub email: String,
    pub commit_count: u32,
    pub total_insertions: u64,
    pub total_deletions: u64,
}

impl AuthorStats {
    pub fn new(name: String, email: String) -> Self {
        Self {
            name,
            email,
            commit_count: 0,
            total_insertions: 0,
            total_deletions: 0,
        }
    }

    pub fn add_commit(&mut self, record: &CommitRecord) {
        self.commit_count += 1;
        self.total_insertions += record.insertions;
        self.total_deletions += record.deletions;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalHistogram {
    pub by_hour: [u32; 24],
    pub by_weekday: [u32; 7],
    pub by_date: BTreeMap<NaiveDate, u32>,
}

impl TemporalHistogram {
    pub fn peak_hour(&self) -> Option<PeakBucket> {
        peak(&self.by_hour).map(|(index, count)| PeakBucket {
            index,
            label: format!("{index:02}:00"),
            count,
        })
    }

    pub fn peak_weekday(&self) -> Option<PeakBucket> {
        peak(&self.by_weekday).map(|(index, count)| PeakBucket {
            index,
            label: WEEKDAY_NAMES[index].to_string(),
            count,
        })
    }
}

/// Largest bucket, ties resolved to the lowest index. `None` when all are zero.
fn peak(buckets: &[u32]) -> Option<(usize, u32)> {
    let mut best: Option<(usize, u32)> = None;
    for (index, &count) in buckets.iter().enumerate() {
        if count == 0 {
            continue;
        }
        match best {
            Some((_, top)) if top >= count => {}
            _ => best = Some((index, count)),
        }
    }
    best
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakBucket {
    pub index: usize,
    pub label: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathCount {
    pub path: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionCount {
    pub extension: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileStats {
    pub distinct_files: usize,
    pub top_files: Vec<PathCount>,
    pub extensions: Vec<ExtensionCount>,
    pub total_insertions: u64,
    pub total_deletions: u64,
    pub net_lines: i64,
    pub avg_insertions_per_commit: f64,
    pub avg_deletions_per_commit: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageClass {
    pub kind: Option<String>,
    pub length: usize,
}

impl MessageClass {
    pub fn is_conventional(&self) -> bool {
        self.kind.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageStats {
    pub total: u32,
    pub average_length: f64,
    pub conventional_count: u32,
    pub conventional_percentage: f64,
    pub types: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductivityScore {
    pub total: f64,
    pub frequency: f64,
    pub quality: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub total_commits: usize,
    pub author_count: usize,
    pub authors: Vec<AuthorStats>,
    pub temporal: TemporalHistogram,
    /// `None` when no commit falls in the window; renderers must skip it.
    pub most_productive_hour: Option<PeakBucket>,
    /// `None` when no commit falls in the window; renderers must skip it.
    pub most_productive_day: Option<PeakBucket>,
    pub files: FileStats,
    pub messages: MessageStats,
    pub score: ProductivityScore,
    pub parse_warnings: usize,
}

impl AnalysisReport {
    pub fn is_empty(&self) -> bool {
        self.total_commits == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub now: DateTime<Utc>,
    pub days: u32,
    pub author: Option<String>,
    pub author_match: AuthorMatch,
    pub report: AnalysisReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitsOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub now: DateTime<Utc>,
    pub days: u32,
    pub author: Option<String>,
    pub parse_warnings: usize,
    pub entries: Vec<CommitRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_includes_both_edges() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let window = Window::new(now, 2);
        assert!(window.contains(&now));
        assert!(window.contains(&(now - Duration::days(2))));
        assert!(!window.contains(&(now - Duration::days(2) - Duration::seconds(1))));
        assert!(!window.contains(&(now + Duration::seconds(1))));
    }

    #[test]
    fn zero_day_window_covers_last_day() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let window = Window::new(now, 0);
        assert_eq!(window.span_days(), 1);
        assert!(window.contains(&(now - Duration::hours(23))));
        assert!(!window.contains(&(now - Duration::hours(25))));
    }

    #[test]
    fn huge_span_saturates_instead_of_overflowing() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let window = Window::new(now, u32::MAX);
        assert_eq!(window.start(), DateTime::<Utc>::MIN_UTC);
        assert!(window.contains(&Utc.timestamp_opt(0, 0).unwrap()));
        assert!(window.contains(&now));
    }

    #[test]
    fn peak_prefers_lowest_index_on_tie() {
        let mut hist = TemporalHistogram::default();
        hist.by_hour[9] = 3;
        hist.by_hour[14] = 3;
        hist.by_weekday[4] = 1;
        let hour = hist.peak_hour().unwrap();
        assert_eq!(hour.index, 9);
        assert_eq!(hour.label, "09:00");
        assert_eq!(hist.peak_weekday().unwrap().label, "Friday");
    }

    #[test]
    fn peak_is_none_for_empty_histogram() {
        let hist = TemporalHistogram::default();
        assert!(hist.peak_hour().is_none());
        assert!(hist.peak_weekday().is_none());
    }
}
