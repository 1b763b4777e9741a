use crate::model::{CommitRecord, MessageClass, MessageStats};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn conventional_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([a-z]+)(?:\([^)]*\))?: ").expect("conventional commit pattern is valid")
    })
}

/// Conventional-commit type and character length of a subject line.
pub fn classify(subject: &str) -> MessageClass {
    let kind = conventional_pattern()
        .captures(subject)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    MessageClass {
        kind,
        length: subject.chars().count(),
    }
}

pub fn message_stats(records: &[CommitRecord]) -> MessageStats {
    let mut total_length = 0usize;
    let mut conventional_count = 0u32;
    let mut types: BTreeMap<String, u32> = BTreeMap::new();

    for record in records {
        let class = classify(&record.subject);
        total_length += class.length;
        if let Some(kind) = class.kind {
            conventional_count += 1;
            *types.entry(kind).or_insert(0) += 1;
        }
    }

    let total = records.len();
    let (average_length, conventional_percentage) = if total == 0 {
        (0.0, 0.0)
    } else {
        (
            total_length as f64 / total as f64,
            conventional_count as f64 / total as f64 * 100.0,
        )
    };

    MessageStats {
        total: total as u32,
        average_length,
        conventional_count,
        conventional_percentage,
        types,
    }
}
