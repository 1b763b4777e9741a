use crate::model::{CommitRecord, Window};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How `--author` is compared against a commit's author name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AuthorMatch {
    /// Case-sensitive equality.
    #[default]
    Exact,
    /// Case-insensitive substring.
    Fuzzy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorFilter {
    pub name: String,
    pub mode: AuthorMatch,
}

impl AuthorFilter {
    pub fn new(name: impl Into<String>, mode: AuthorMatch) -> Self {
        Self {
            name: name.into(),
            mode,
        }
    }

    pub fn matches(&self, author_name: &str) -> bool {
        match self.mode {
            AuthorMatch::Exact => author_name == self.name,
            AuthorMatch::Fuzzy => author_name
                .to_lowercase()
                .contains(&self.name.to_lowercase()),
        }
    }
}

pub fn filter_records(
    records: &[CommitRecord],
    window: &Window,
    author: Option<&AuthorFilter>,
) -> Vec<CommitRecord> {
    records
        .iter()
        .filter(|r| window.contains(&r.timestamp))
        .filter(|r| author.map_or(true, |a| a.matches(&r.author_name)))
        .cloned()
        .collect()
}
