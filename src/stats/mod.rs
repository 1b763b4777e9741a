//! Aggregation passes over a filtered commit set.
//!
//! Each pass reads the same immutable slice and returns its own value;
//! [`analyze`] runs them on the rayon pool and assembles the report.

pub mod authors;
pub mod files;
pub mod messages;
pub mod score;
pub mod temporal;

pub use authors::author_stats;
pub use files::{extension_of, file_stats, DEFAULT_TOP};
pub use messages::{classify, message_stats};
pub use score::productivity_score;
pub use temporal::temporal_histogram;

use crate::model::{AnalysisReport, CommitRecord};
use chrono::TimeZone;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Length of the analysed window, used for the commit rate.
    pub window_days: u32,
    /// Number of paths and extensions kept in the file rankings.
    pub top: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            window_days: 30,
            top: DEFAULT_TOP,
        }
    }
}

pub fn analyze<Tz>(
    records: &[CommitRecord],
    parse_warnings: usize,
    options: &AnalysisOptions,
    tz: &Tz,
) -> AnalysisReport
where
    Tz: TimeZone + Sync,
{
    debug!(
        "Aggregating {} commits over {} day(s)",
        records.len(),
        options.window_days
    );

    let ((temporal, authors), (files, messages)) = rayon::join(
        || rayon::join(|| temporal_histogram(records, tz), || author_stats(records)),
        || rayon::join(|| file_stats(records, options.top), || message_stats(records)),
    );
    let score = productivity_score(records, &messages, options.window_days);

    AnalysisReport {
        total_commits: records.len(),
        author_count: authors.len(),
        authors,
        most_productive_hour: temporal.peak_hour(),
        most_productive_day: temporal.peak_weekday(),
        temporal,
        files,
        messages,
        score,
        parse_warnings,
    }
}
