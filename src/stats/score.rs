//! Composite productivity score.
//!
//! The score is a fixed weighted sum of three sub-scores, each already
//! bounded to `[0, 100]`:
//!
//! | component | weight | definition |
//! |-----------|--------|------------|
//! | frequency | 0.4 | commits per day, linear up to 4/day then flat |
//! | quality   | 0.3 | half conventional percentage, half subject length band |
//! | volume    | 0.3 | `ln(1 + total lines) / ln(5001)` over the whole set, capped at 1 |
//!
//! The total is clamped to `[0, 100]` and rounded to two decimals. An empty
//! commit set scores exactly zero.

use crate::model::{CommitRecord, MessageStats, ProductivityScore};

pub const FREQUENCY_WEIGHT: f64 = 0.4;
pub const QUALITY_WEIGHT: f64 = 0.3;
pub const VOLUME_WEIGHT: f64 = 0.3;

/// Commits per day at which the frequency score saturates.
pub const SATURATING_COMMITS_PER_DAY: f64 = 4.0;

/// Subject lengths inside this inclusive band score full marks.
pub const SUBJECT_LENGTH_BAND: (usize, usize) = (10, 72);

/// Points lost per character beyond the upper band edge.
const OVERLONG_PENALTY: f64 = 2.0;

/// Total lines changed across the set at which the volume score saturates.
pub const SATURATING_LINES: f64 = 5_000.0;

pub fn productivity_score(
    records: &[CommitRecord],
    messages: &MessageStats,
    window_days: u32,
) -> ProductivityScore {
    if records.is_empty() {
        return ProductivityScore::default();
    }

    let frequency = frequency_score(records.len(), window_days);
    let quality = quality_score(records, messages);
    let total_lines = records
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.lines_changed()));
    let volume = volume_score(total_lines);

    let total = FREQUENCY_WEIGHT * frequency + QUALITY_WEIGHT * quality + VOLUME_WEIGHT * volume;

    ProductivityScore {
        total: round2(bounded(total)),
        frequency: round2(frequency),
        quality: round2(quality),
        volume: round2(volume),
    }
}

pub fn frequency_score(commits: usize, window_days: u32) -> f64 {
    let per_day = commits as f64 / window_days.max(1) as f64;
    bounded(per_day / SATURATING_COMMITS_PER_DAY * 100.0)
}

fn quality_score(records: &[CommitRecord], messages: &MessageStats) -> f64 {
    let lengths: f64 = records
        .iter()
        .map(|r| subject_length_score(r.subject.chars().count()))
        .sum();
    let length_score = lengths / records.len() as f64;
    bounded(0.5 * messages.conventional_percentage + 0.5 * length_score)
}

pub fn subject_length_score(length: usize) -> f64 {
    let (low, high) = SUBJECT_LENGTH_BAND;
    if length < low {
        length as f64 / low as f64 * 100.0
    } else if length <= high {
        100.0
    } else {
        bounded(100.0 - OVERLONG_PENALTY * (length - high) as f64)
    }
}

/// Logarithmic, capped score of the total insertions plus deletions.
pub fn volume_score(total_lines: u64) -> f64 {
    let scaled = (total_lines as f64).ln_1p() / SATURATING_LINES.ln_1p();
    bounded(scaled.min(1.0) * 100.0)
}

/// Clamps to `[0, 100]`, mapping non-finite values to zero.
fn bounded(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
