use crate::model::{CommitRecord, ExtensionCount, FileStats, PathCount};
use std::collections::HashMap;

pub const DEFAULT_TOP: usize = 10;

/// Bucket for paths whose file name carries no extension.
pub const NO_EXTENSION: &str = "none";

/// Text after the last `.` of the file name, or [`NO_EXTENSION`].
pub fn extension_of(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => NO_EXTENSION,
    }
}

pub fn file_stats(records: &[CommitRecord], top: usize) -> FileStats {
    let mut paths: HashMap<&str, u32> = HashMap::new();
    let mut extensions: HashMap<&str, u32> = HashMap::new();
    let mut total_insertions = 0u64;
    let mut total_deletions = 0u64;

    for record in records {
        total_insertions += record.insertions;
        total_deletions += record.deletions;
        for path in &record.files {
            *paths.entry(path.as_str()).or_insert(0) += 1;
            *extensions.entry(extension_of(path)).or_insert(0) += 1;
        }
    }

    let commits = records.len();
    let per_commit = |total: u64| {
        if commits == 0 {
            0.0
        } else {
            total as f64 / commits as f64
        }
    };

    FileStats {
        distinct_files: paths.len(),
        top_files: rank(paths, top)
            .into_iter()
            .map(|(path, count)| PathCount { path, count })
            .collect(),
        extensions: rank(extensions, top)
            .into_iter()
            .map(|(extension, count)| ExtensionCount { extension, count })
            .collect(),
        total_insertions,
        total_deletions,
        net_lines: total_insertions as i64 - total_deletions as i64,
        avg_insertions_per_commit: per_commit(total_insertions),
        avg_deletions_per_commit: per_commit(total_deletions),
    }
}

/// Count descending, key ascending, truncated to `top`.
fn rank(counts: HashMap<&str, u32>, top: usize) -> Vec<(String, u32)> {
    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(top)
        .map(|(key, count)| (key.to_string(), count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn record(hash: &str, files: &[&str], insertions: u64, deletions: u64) -> CommitRecord {
        CommitRecord {
            hash: hash.to_string(),
            author_name: "Alice".to_string(),
            author_email: String::new(),
            timestamp: Utc::now(),
            subject: String::new(),
            insertions,
            deletions,
            files: files.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn extension_rules() {
        assert_eq!(extension_of("src/main.rs"), "rs");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("Makefile"), NO_EXTENSION);
        assert_eq!(extension_of("conf.d/Makefile"), NO_EXTENSION);
        assert_eq!(extension_of(".gitignore"), "gitignore");
        assert_eq!(extension_of("weird."), NO_EXTENSION);
    }

    #[test]
    fn most_changed_file_ranks_first() {
        let records = vec![
            record("1", &["src/main.py"], 1, 0),
            record("2", &["src/main.py"], 1, 0),
            record("3", &["README.md"], 1, 0),
        ];
        let stats = file_stats(&records, 1);
        assert_eq!(
            stats.top_files,
            vec![PathCount {
                path: "src/main.py".to_string(),
                count: 2
            }]
        );

        let stats = file_stats(&records, 10);
        assert_eq!(stats.top_files[1].path, "README.md");
        assert_eq!(stats.top_files[1].count, 1);
        assert_eq!(stats.distinct_files, 2);
    }

    #[test]
    fn each_commit_counts_once_per_path() {
        let records = vec![record("1", &["a.rs", "b.rs", "c.toml"], 0, 0)];
        let stats = file_stats(&records, 10);
        assert!(stats.top_files.iter().all(|p| p.count == 1));
        assert_eq!(
            stats.extensions,
            vec![
                ExtensionCount {
                    extension: "rs".to_string(),
                    count: 2
                },
                ExtensionCount {
                    extension: "toml".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn ties_are_ranked_alphabetically() {
        let records = vec![record("1", &["b.rs", "a.rs", "c.rs"], 0, 0)];
        let paths: Vec<_> = file_stats(&records, 2)
            .top_files
            .into_iter()
            .map(|p| p.path)
            .collect();
        assert_eq!(paths, vec!["a.rs", "b.rs"]);
    }

    #[test]
    fn totals_and_averages() {
        let records = vec![record("1", &["a.rs"], 10, 2), record("2", &["b.rs"], 5, 9)];
        let stats = file_stats(&records, 10);
        assert_eq!(stats.total_insertions, 15);
        assert_eq!(stats.total_deletions, 11);
        assert_eq!(stats.net_lines, 4);
        assert_eq!(stats.avg_insertions_per_commit, 7.5);
        assert_eq!(stats.avg_deletions_per_commit, 5.5);
    }

    #[test]
    fn empty_input_is_zeroed() {
        let stats = file_stats(&[], 10);
        assert_eq!(stats, FileStats::default());
    }
}
