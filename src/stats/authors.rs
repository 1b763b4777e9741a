use crate::model::{AuthorStats, CommitRecord};
use std::collections::HashMap;

/// Per-author rollup, ranked by commit count descending then name ascending.
pub fn author_stats(records: &[CommitRecord]) -> Vec<AuthorStats> {
    let mut map: HashMap<&str, AuthorStats> = HashMap::new();
    for record in records {
        map.entry(record.author_name.as_str())
            .or_insert_with(|| {
                AuthorStats::new(record.author_name.clone(), record.author_email.clone())
            })
            .add_commit(record);
    }

    let mut authors: Vec<_> = map.into_values().collect();
    authors.sort_by(|a, b| {
        b.commit_count
            .cmp(&a.commit_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    authors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn record(hash: &str, author: &str, insertions: u64, deletions: u64) -> CommitRecord {
        CommitRecord {
            hash: hash.to_string(),
            author_name: author.to_string(),
            author_email: format!("{}@example.com", author.to_lowercase()),
            timestamp: Utc::now(),
            subject: String::new(),
            insertions,
            deletions,
            files: BTreeSet::new(),
        }
    }

    #[test]
    fn ranks_by_commits_and_sums_lines() {
        let records = vec![
            record("a1", "Alice", 10, 2),
            record("b1", "Bob", 3, 0),
            record("a2", "Alice", 5, 1),
        ];
        let authors = author_stats(&records);
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].name, "Alice");
        assert_eq!(authors[0].commit_count, 2);
        assert_eq!(authors[0].total_insertions, 15);
        assert_eq!(authors[0].total_deletions, 3);
        assert_eq!(authors[0].email, "alice@example.com");
        assert_eq!(authors[1].name, "Bob");
        assert_eq!(authors[1].commit_count, 1);

        let insertions: u64 = authors.iter().map(|a| a.total_insertions).sum();
        let deletions: u64 = authors.iter().map(|a| a.total_deletions).sum();
        assert_eq!(insertions, 18);
        assert_eq!(deletions, 3);
    }

    #[test]
    fn ties_are_broken_by_name() {
        let records = vec![
            record("1", "zed", 0, 0),
            record("2", "Carol", 0, 0),
            record("3", "amy", 0, 0),
        ];
        let names: Vec<_> = author_stats(&records).into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Carol", "amy", "zed"]);
    }

    #[test]
    fn commit_counts_sum_to_total() {
        let records: Vec<_> = (0..17)
            .map(|i| record(&i.to_string(), ["A", "B", "C"][i % 3], 1, 1))
            .collect();
        let total: u32 = author_stats(&records).iter().map(|a| a.commit_count).sum();
        assert_eq!(total as usize, records.len());
    }
}
