//! Optional TOML configuration.
//!
//! Discovery order, first existing file wins:
//! 1. `--config <path>`
//! 2. `$COMMITLENS_CONFIG`
//! 3. `<config dir>/commitlens/config.toml`
//! 4. `~/.commitlens.toml`
//! 5. `./.commitlens.toml`
//!
//! ```toml
//! days = 90
//! top = 15
//! timeout = "2m"
//! author_match = "fuzzy"
//! ```

use crate::error::{LensError, Result};
use crate::filter::AuthorMatch;
use crate::git::DEFAULT_TIMEOUT;
use crate::stats::DEFAULT_TOP;
use log::{debug, info};
use serde::{Deserialize, Deserializer};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "COMMITLENS_CONFIG";

pub const DEFAULT_DAYS: u32 = 30;

/// Longest accepted window, a little over 2,700 years.
pub const MAX_DAYS: u32 = 1_000_000;

/// One source of settings; unset fields fall through to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub days: Option<u32>,
    pub top: Option<usize>,
    #[serde(default, deserialize_with = "duration_opt")]
    pub timeout: Option<Duration>,
    pub author_match: Option<AuthorMatch>,
}

impl ConfigLayer {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Fields set on `self` win over `fallback`.
    pub fn or(self, fallback: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            days: self.days.or(fallback.days),
            top: self.top.or(fallback.top),
            timeout: self.timeout.or(fallback.timeout),
            author_match: self.author_match.or(fallback.author_match),
        }
    }
}

fn duration_opt<'de, D>(deserializer: D) -> std::result::Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| humantime::parse_duration(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub days: u32,
    pub top: usize,
    pub timeout: Duration,
    pub author_match: AuthorMatch,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS,
            top: DEFAULT_TOP,
            timeout: DEFAULT_TIMEOUT,
            author_match: AuthorMatch::default(),
        }
    }
}

impl Settings {
    pub fn from_layer(layer: ConfigLayer) -> Result<Self> {
        let defaults = Settings::default();
        let top = layer.top.unwrap_or(defaults.top);
        if top == 0 {
            return Err(LensError::InvalidSetting("top must be at least 1".to_string()));
        }
        let days = layer.days.unwrap_or(defaults.days);
        if days > MAX_DAYS {
            return Err(LensError::InvalidSetting(format!(
                "days must be at most {MAX_DAYS}, got {days}"
            )));
        }
        let timeout = layer.timeout.unwrap_or(defaults.timeout);
        if timeout.is_zero() {
            return Err(LensError::InvalidSetting("timeout must be positive".to_string()));
        }
        Ok(Self {
            days,
            top,
            timeout,
            author_match: layer.author_match.unwrap_or(defaults.author_match),
        })
    }
}

/// Loads the explicit file if given, otherwise the first discovered one.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigLayer> {
    if let Some(path) = explicit {
        info!("Loading configuration from: {}", path.display());
        return ConfigLayer::from_file(path);
    }

    for path in discover_config_files() {
        if path.is_file() {
            info!("Loading configuration from: {}", path.display());
            return ConfigLayer::from_file(&path);
        }
    }

    debug!("No configuration file found, using defaults");
    Ok(ConfigLayer::default())
}

fn discover_config_files() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = env::var(CONFIG_ENV) {
        paths.push(PathBuf::from(env_path));
    }
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("commitlens").join("config.toml"));
    }
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".commitlens.toml"));
    }
    paths.push(PathBuf::from("./.commitlens.toml"));

    debug!("Config discovery paths: {:?}", paths);
    paths
}
