//! Decoding of `git log --numstat` output into commit records.
//!
//! The extractor asks git for one header line per commit, made of five
//! fields joined by the ASCII unit separator and optionally prefixed by the
//! record separator, followed by numstat lines:
//!
//! ```text
//! \x1e<hash>\x1f<author name>\x1f<author email>\x1f<epoch>\x1f<subject>
//! 10\t2\tsrc/main.rs
//! -\t-\tlogo.png
//! ```
//!
//! Malformed entries never abort the parse. They are dropped and recorded
//! as [`ParseWarning`]s.

use crate::model::CommitRecord;
use chrono::DateTime;
use log::warn;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

pub const RECORD_SEPARATOR: char = '\x1e';
pub const FIELD_SEPARATOR: char = '\x1f';

/// `--pretty` argument producing the header layout this parser expects.
pub const LOG_FORMAT: &str = "--pretty=format:%x1e%H%x1f%an%x1f%ae%x1f%at%x1f%s";

const HEADER_FIELDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarningKind {
    MissingFields { found: usize },
    EmptyHash,
    EmptyAuthor,
    InvalidTimestamp { value: String },
    DuplicateHash { hash: String },
    MalformedStat,
    OrphanStat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub line: usize,
    pub kind: ParseWarningKind,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseWarningKind::MissingFields { found } => write!(
                f,
                "line {}: commit header has {found} of {HEADER_FIELDS} fields",
                self.line
            ),
            ParseWarningKind::EmptyHash => write!(f, "line {}: commit header without hash", self.line),
            ParseWarningKind::EmptyAuthor => {
                write!(f, "line {}: commit header without author name", self.line)
            }
            ParseWarningKind::InvalidTimestamp { value } => {
                write!(f, "line {}: invalid timestamp '{value}'", self.line)
            }
            ParseWarningKind::DuplicateHash { hash } => {
                write!(f, "line {}: duplicate commit {hash}, later entry dropped", self.line)
            }
            ParseWarningKind::MalformedStat => write!(f, "line {}: malformed numstat line", self.line),
            ParseWarningKind::OrphanStat => {
                write!(f, "line {}: numstat line outside of any commit", self.line)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLog {
    pub records: Vec<CommitRecord>,
    pub warnings: Vec<ParseWarning>,
}

impl ParsedLog {
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

enum Current {
    None,
    Record(CommitRecord),
    /// Header was rejected; its numstat lines are swallowed.
    Skipping,
}

pub fn parse_log(raw: &str) -> ParsedLog {
    let mut parsed = ParsedLog::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut current = Current::None;

    for (idx, line) in raw.lines().enumerate() {
        let line_no = idx + 1;

        if line.contains(FIELD_SEPARATOR) {
            if let Current::Record(record) = std::mem::replace(&mut current, Current::None) {
                parsed.records.push(record);
            }
            current = match parse_header(line) {
                Ok(record) if !seen.insert(record.hash.clone()) => {
                    parsed.warnings.push(ParseWarning {
                        line: line_no,
                        kind: ParseWarningKind::DuplicateHash { hash: record.hash },
                    });
                    Current::Skipping
                }
                Ok(record) => Current::Record(record),
                Err(kind) => {
                    parsed.warnings.push(ParseWarning { line: line_no, kind });
                    Current::Skipping
                }
            };
            continue;
        }

        let trimmed = line.trim_matches(|c: char| c == RECORD_SEPARATOR || c.is_whitespace());
        if trimmed.is_empty() {
            continue;
        }

        match &mut current {
            Current::Record(record) => match parse_stat(line) {
                Some((insertions, deletions, path)) => {
                    record.insertions += insertions;
                    record.deletions += deletions;
                    record.files.insert(path);
                }
                None => parsed.warnings.push(ParseWarning {
                    line: line_no,
                    kind: ParseWarningKind::MalformedStat,
                }),
            },
            Current::Skipping => {}
            Current::None => parsed.warnings.push(ParseWarning {
                line: line_no,
                kind: ParseWarningKind::OrphanStat,
            }),
        }
    }

    if let Current::Record(record) = current {
        parsed.records.push(record);
    }

    parsed
}

/// Logs the first few warnings individually and the remainder as a count.
pub fn log_warnings(warnings: &[ParseWarning]) {
    const SHOWN: usize = 10;
    for warning in warnings.iter().take(SHOWN) {
        warn!("Skipped log entry: {warning}");
    }
    if warnings.len() > SHOWN {
        warn!("... and {} more malformed log entries", warnings.len() - SHOWN);
    }
}

fn parse_header(line: &str) -> Result<CommitRecord, ParseWarningKind> {
    let line = line.trim_start_matches(RECORD_SEPARATOR);
    let fields: Vec<&str> = line.splitn(HEADER_FIELDS, FIELD_SEPARATOR).collect();
    if fields.len() < HEADER_FIELDS {
        return Err(ParseWarningKind::MissingFields { found: fields.len() });
    }

    let hash = fields[0].trim();
    if hash.is_empty() {
        return Err(ParseWarningKind::EmptyHash);
    }
    let author_name = fields[1].trim();
    if author_name.is_empty() {
        return Err(ParseWarningKind::EmptyAuthor);
    }

    let raw_ts = fields[3].trim();
    let timestamp = raw_ts
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| ParseWarningKind::InvalidTimestamp {
            value: raw_ts.to_string(),
        })?;

    Ok(CommitRecord {
        hash: hash.to_string(),
        author_name: author_name.to_string(),
        author_email: fields[2].trim().to_string(),
        timestamp,
        subject: fields[4].trim_end_matches(['\r', '\n']).to_string(),
        insertions: 0,
        deletions: 0,
        files: BTreeSet::new(),
    })
}

/// `<ins>\t<del>\t<path>`; `-` counts (binary files) read as zero.
fn parse_stat(line: &str) -> Option<(u64, u64, String)> {
    let mut parts = line.trim_end_matches('\r').splitn(3, '\t');
    let insertions = parse_count(parts.next()?)?;
    let deletions = parse_count(parts.next()?)?;
    let path = normalize_rename_path(parts.next()?);
    if path.is_empty() {
        return None;
    }
    Some((insertions, deletions, path))
}

fn parse_count(field: &str) -> Option<u64> {
    match field.trim() {
        "-" => Some(0),
        value => value.parse().ok(),
    }
}

/// Resolves git's rename notation to the destination path:
/// `old => new` and `dir/{old => new}/file`.
pub fn normalize_rename_path(path: &str) -> String {
    let value = path.trim();
    if !value.contains(" => ") {
        return value.to_string();
    }

    if let (Some(open), Some(close)) = (value.find('{'), value.rfind('}')) {
        if open < close {
            let inner = &value[open + 1..close];
            if let Some((_, to)) = inner.split_once(" => ") {
                let prefix = &value[..open];
                let suffix = &value[close + 1..];
                let joined = format!("{prefix}{}{suffix}", to.trim());
                return joined.replace("//", "/");
            }
        }
    }

    value
        .rsplit_once(" => ")
        .map(|(_, to)| to.trim().to_string())
        .unwrap_or_else(|| value.to_string())
}
