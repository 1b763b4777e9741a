use crate::config::ConfigLayer;
use crate::filter::AuthorMatch;
use crate::logging;
use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "commitlens")]
#[command(about = "Analyze git commit history: patterns, message quality, change volume and productivity")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Clone, Debug, Default)]
pub struct CommonArgs {
    #[arg(long = "repo-path", alias = "repo", global = true, help = "Path to git repository (default: current directory)")]
    pub repo_path: Option<PathBuf>,

    #[arg(long, global = true, help = "Number of days to analyze (default: 30, 0 = last 24 hours)")]
    pub days: Option<u32>,

    #[arg(long, global = true, help = "Only include commits by this author")]
    pub author: Option<String>,

    #[arg(long, value_enum, global = true, help = "How --author is matched (default: exact)")]
    pub author_match: Option<AuthorMatch>,

    #[arg(long, global = true, help = "End of the analysis window (RFC3339, YYYY-MM-DD, epoch seconds, or 'N days ago')")]
    pub now: Option<String>,

    #[arg(long, global = true, value_parser = humantime::parse_duration, help = "Abort if git log runs longer than this (default: 60s)")]
    pub timeout: Option<Duration>,

    #[arg(long, global = true, help = "Number of files and file types to rank (default: 10)")]
    pub top: Option<usize>,

    #[arg(long, global = true, help = "Write the JSON result to this file")]
    pub export: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Only log errors")]
    pub quiet: bool,
}

impl CommonArgs {
    /// Settings given on the command line, layered above the config file.
    pub fn overrides(&self) -> ConfigLayer {
        ConfigLayer {
            days: self.days,
            top: self.top,
            timeout: self.timeout,
            author_match: self.author_match,
        }
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Full analysis report (default)
    Report {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// List the commits inside the analysis window
    Commits {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, conflicts_with = "json", help = "Output as NDJSON")]
        ndjson: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Ndjson,
}

impl OutputFormat {
    pub fn from_flags(json: bool, ndjson: bool) -> Self {
        if json {
            OutputFormat::Json
        } else if ndjson {
            OutputFormat::Ndjson
        } else {
            OutputFormat::Text
        }
    }
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        logging::init(self.common.verbose, self.common.quiet);

        match self.command.unwrap_or(Commands::Report { json: false }) {
            Commands::Report { json } => {
                crate::report::exec(self.common, OutputFormat::from_flags(json, false))
            }
            Commands::Commits { json, ndjson } => {
                crate::commits::exec(self.common, OutputFormat::from_flags(json, ndjson))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse_before_and_after_subcommand() {
        let cli = Cli::try_parse_from([
            "commitlens",
            "--days",
            "7",
            "commits",
            "--author",
            "Alice",
            "--ndjson",
        ])
        .unwrap();
        assert_eq!(cli.common.days, Some(7));
        assert_eq!(cli.common.author.as_deref(), Some("Alice"));
        assert!(matches!(
            cli.command,
            Some(Commands::Commits {
                json: false,
                ndjson: true
            })
        ));
    }

    #[test]
    fn subcommand_is_optional() {
        let cli = Cli::try_parse_from(["commitlens", "--repo-path", "/tmp/x"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.common.repo_path, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn timeout_and_author_match_are_typed() {
        let cli = Cli::try_parse_from([
            "commitlens",
            "--timeout",
            "90s",
            "--author-match",
            "fuzzy",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.common.timeout, Some(Duration::from_secs(90)));
        assert_eq!(cli.common.author_match, Some(AuthorMatch::Fuzzy));
        assert_eq!(cli.common.verbose, 2);
    }

    #[test]
    fn json_and_ndjson_conflict() {
        assert!(Cli::try_parse_from(["commitlens", "commits", "--json", "--ndjson"]).is_err());
    }

    #[test]
    fn output_format_resolution() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Text);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Ndjson);
    }
}
