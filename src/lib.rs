//! Commit history analysis.
//!
//! Raw `git log --numstat` text is parsed into [`model::CommitRecord`]s,
//! narrowed to a time window and optional author, and reduced into an
//! immutable [`model::AnalysisReport`]: temporal histograms, author
//! rollups, file change frequency, message quality and a bounded
//! productivity score.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use commitlens::model::Window;
//!
//! let raw = "\x1ea1\x1fAlice\x1falice@example.com\x1f1700000000\x1ffeat(api): add endpoint\n\
//!            10\t2\tsrc/api.rs\n";
//! let now = Utc.timestamp_opt(1_700_000_100, 0).unwrap();
//! let report = commitlens::analyze_log(raw, &Window::new(now, 30), None, 10, &Utc);
//! assert_eq!(report.total_commits, 1);
//! assert_eq!(report.messages.types.get("feat"), Some(&1));
//! ```

pub mod cli;
pub mod commits;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod filter;
pub mod git;
pub mod logging;
pub mod model;
pub mod parse;
pub mod report;
pub mod stats;
pub mod util;

use chrono::TimeZone;
use filter::{filter_records, AuthorFilter};
use model::{AnalysisReport, Window};
use stats::AnalysisOptions;

/// Parse, filter and aggregate one log buffer.
pub fn analyze_log<Tz>(
    raw: &str,
    window: &Window,
    author: Option<&AuthorFilter>,
    top: usize,
    tz: &Tz,
) -> AnalysisReport
where
    Tz: TimeZone + Sync,
{
    let parsed = parse::parse_log(raw);
    parse::log_warnings(&parsed.warnings);

    let filtered = filter_records(&parsed.records, window, author);
    let options = AnalysisOptions {
        window_days: window.span_days(),
        top,
    };
    stats::analyze(&filtered, parsed.warning_count(), &options, tz)
}
