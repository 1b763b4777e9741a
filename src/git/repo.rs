use crate::error::{LensError, Result};
use crate::parse::LOG_FORMAT;
use chrono::{DateTime, Utc};
use gix::{discover, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

/// Parameters for one `git log` extraction.
#[derive(Debug, Clone)]
pub struct LogRequest {
    /// Lower bound passed to `--since`, a best-effort pre-filter only. Git
    /// compares it with the committer date and stops walking at the first
    /// older commit, so commits authored inside the window but committed
    /// earlier (skewed clocks, `--date` in the future) or reachable only
    /// behind an older commit can be missed. The window filter re-checks
    /// author dates on whatever is returned.
    pub since: Option<DateTime<Utc>>,
    pub timeout: Duration,
    pub progress: bool,
}

impl Default for LogRequest {
    fn default() -> Self {
        Self {
            since: None,
            timeout: DEFAULT_TIMEOUT,
            progress: false,
        }
    }
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        if !repo_path.exists() {
            return Err(LensError::repo_not_found(repo_path, "path does not exist"));
        }

        let repo = discover(&repo_path).map_err(|e| LensError::repo_not_found(&repo_path, e))?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        debug!("Opened repository at {}", path.display());

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_unborn(&self) -> bool {
        self.repo.head().map(|head| head.is_unborn()).unwrap_or(false)
    }

    /// Runs `git log` with the record format the parser expects and returns
    /// its complete standard output.
    pub fn fetch_log(&self, request: &LogRequest) -> Result<String> {
        if self.is_unborn() {
            info!("Repository has no commits yet");
            return Ok(String::new());
        }

        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(&self.path)
            .args([
                "-c",
                "core.quotePath=false",
                "-c",
                "log.showSignature=false",
                "--no-pager",
                "log",
                "--no-color",
                LOG_FORMAT,
                "--numstat",
            ]);
        if let Some(since) = request.since {
            cmd.arg(format!("--since={}", since.to_rfc3339()));
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!("Running {:?}", cmd);

        let pb = if request.progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };
        pb.set_message("Reading commit history...");

        let output = run_with_timeout(cmd, request.timeout);
        pb.finish_and_clear();
        let stdout = output?;

        info!("Read {} bytes of git log output", stdout.len());
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Result<Vec<u8>> {
    let mut child = cmd
        .spawn()
        .map_err(|e| LensError::GitCommand(format!("failed to run git: {e}")))?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(LensError::GitCommand(format!(
                "git log timed out after {}",
                humantime::format_duration(timeout)
            )));
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = join_reader(stdout)?;
    let stderr = join_reader(stderr)?;

    if !status.success() {
        return Err(LensError::GitCommand(format!(
            "git log exited with {status}: {}",
            String::from_utf8_lossy(&stderr).trim()
        )));
    }

    Ok(stdout)
}

type Reader = Option<thread::JoinHandle<std::io::Result<Vec<u8>>>>;

/// Reads a child pipe to the end on its own thread so a full pipe never
/// blocks the child.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Reader {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf).map(|_| buf)
        })
    })
}

fn join_reader(reader: Reader) -> Result<Vec<u8>> {
    match reader {
        Some(handle) => handle
            .join()
            .map_err(|_| LensError::GitCommand("pipe reader panicked".to_string()))?
            .map_err(LensError::from),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_path_is_repo_not_found() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = GitRepo::open(Some(&missing)).err().unwrap();
        assert!(matches!(err, LensError::RepoNotFound { .. }));
    }

    #[test]
    fn plain_directory_is_repo_not_found() {
        let dir = tempdir().unwrap();
        // tempdirs can live below a checkout on some CI hosts
        match GitRepo::open(Some(dir.path())) {
            Err(err) => assert!(matches!(err, LensError::RepoNotFound { .. })),
            Ok(repo) => assert_ne!(repo.path(), dir.path()),
        }
    }

    #[cfg(unix)]
    #[test]
    fn timeout_kills_the_child() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5").stdout(Stdio::piped()).stderr(Stdio::piped());
        let started = Instant::now();
        let err = run_with_timeout(cmd, Duration::from_millis(100)).unwrap_err();
        assert!(matches!(err, LensError::GitCommand(ref msg) if msg.contains("timed out")));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_reports_stderr() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo boom >&2; exit 3"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let err = run_with_timeout(cmd, Duration::from_secs(5)).unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "printf 'a\\nb\\n'"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let out = run_with_timeout(cmd, Duration::from_secs(5)).unwrap();
        assert_eq!(out, b"a\nb\n");
    }
}
