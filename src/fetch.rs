use crate::cli::CommonArgs;
use crate::config::{load_config, Settings};
use crate::filter::AuthorFilter;
use crate::git::{GitRepo, LogRequest};
use crate::model::Window;
use crate::util::parse_instant;
use anyhow::Context;
use chrono::Utc;
use log::info;

/// Everything a command needs before touching history: the opened
/// repository, resolved settings, the window and the author filter.
pub struct RunContext {
    pub repo: GitRepo,
    pub settings: Settings,
    pub window: Window,
    pub author: Option<AuthorFilter>,
}

impl RunContext {
    pub fn prepare(common: &CommonArgs) -> anyhow::Result<Self> {
        let started = Utc::now();

        let file_layer =
            load_config(common.config.as_deref()).context("Failed to load configuration")?;
        let settings = Settings::from_layer(common.overrides().or(file_layer))
            .context("Invalid configuration")?;

        let now = match common.now.as_deref() {
            Some(raw) => parse_instant(raw, started).context("Failed to parse --now")?,
            None => started,
        };

        let repo = GitRepo::open(common.repo_path.as_ref())
            .context("Failed to open git repository")?;

        let author = common
            .author
            .as_ref()
            .map(|name| AuthorFilter::new(name.clone(), settings.author_match));

        let window = Window::new(now, settings.days);
        info!(
            "Analyzing {} from {} to {}",
            repo.path().display(),
            window.start().to_rfc3339(),
            window.now.to_rfc3339()
        );

        Ok(Self {
            repo,
            settings,
            window,
            author,
        })
    }

    /// Raw `git log` output covering at least the analysis window.
    pub fn fetch_log(&self, progress: bool) -> anyhow::Result<String> {
        // git cannot express dates before the epoch; read everything instead.
        let start = self.window.start();
        let request = LogRequest {
            since: (start.timestamp() > 0).then_some(start),
            timeout: self.settings.timeout,
            progress,
        };
        self.repo
            .fetch_log(&request)
            .context("Failed to read commit history")
    }

    pub fn repository_path(&self) -> String {
        self.repo.path().to_string_lossy().to_string()
    }
}
