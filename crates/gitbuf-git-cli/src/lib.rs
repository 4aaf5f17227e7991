//! Git backend that shells out to the `git` binary for every operation.

mod process_log;
mod repo;
mod runner;

pub use process_log::{ProcessLog, DEFAULT_MAX_LINES};
pub use runner::GitRunner;

use gitbuf_core::error::{Error, ErrorKind};
use gitbuf_core::services::{GitBackend, GitRepository, Result};
use repo::CliRepo;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, OnceLock};

/// Whether a `git` binary is on PATH. Probed once per process.
pub fn git_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    })
}

pub struct CliBackend {
    log: Arc<ProcessLog>,
}

impl CliBackend {
    pub fn new(log: Arc<ProcessLog>) -> Self {
        Self { log }
    }

    pub fn process_log(&self) -> &Arc<ProcessLog> {
        &self.log
    }
}

impl Default for CliBackend {
    fn default() -> Self {
        Self::new(Arc::new(ProcessLog::default()))
    }
}

impl GitBackend for CliBackend {
    fn open(&self, workdir: &Path) -> Result<Arc<dyn GitRepository>> {
        if !git_available() {
            return Err(Error::new(ErrorKind::GitUnavailable));
        }

        let probe = GitRunner::new(Some(workdir.to_path_buf()), Arc::clone(&self.log));
        let output = probe.run(&["rev-parse", "--show-toplevel"]);
        if !output.ok() {
            return Err(Error::new(ErrorKind::NotARepository));
        }

        let root = output.stdout.lines().next().unwrap_or("").trim();
        if root.is_empty() {
            return Err(Error::new(ErrorKind::NotARepository));
        }

        Ok(Arc::new(CliRepo::new(
            PathBuf::from(root),
            Arc::clone(&self.log),
        )))
    }
}
