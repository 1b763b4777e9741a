use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LensError>;

#[derive(Error, Debug)]
pub enum LensError {
    #[error("Not a git repository: {} ({reason})", path.display())]
    RepoNotFound { path: PathBuf, reason: String },
    #[error("Git command failed: {0}")]
    GitCommand(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl LensError {
    pub fn repo_not_found<P: Into<PathBuf>>(path: P, reason: impl std::fmt::Display) -> Self {
        LensError::RepoNotFound {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
