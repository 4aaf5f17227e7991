use crate::domain::{
    BranchInfo, CommitInfo, DiffArea, FileDiff, StashInfo, StatusSnapshot,
};
use crate::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

/// Captured result of one git invocation.
///
/// `exit` is `-1` with empty stdout when the process could not be spawned;
/// the spawn error text is carried in `stderr`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandOutput {
    pub exit: i32,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl CommandOutput {
    pub fn ok(&self) -> bool {
        self.exit == 0
    }

    /// The first stderr line, for one-line user messages.
    pub fn first_error_line(&self) -> &str {
        self.stderr.lines().next().unwrap_or("").trim()
    }
}

/// Where a patch is applied.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ApplyLocation {
    /// `git apply --cached`
    Index,
    /// `git apply`
    Worktree,
}

pub trait GitRepository: Send + Sync {
    fn root(&self) -> &Path;

    // Snapshot fetches; a non-zero exit surfaces as Err and the caller
    // degrades to an empty snapshot.
    fn status_snapshot(&self) -> Result<StatusSnapshot>;
    fn diff_files(&self, area: DiffArea) -> Result<Vec<FileDiff>>;
    fn recent_commits(&self, limit: usize) -> Result<Vec<CommitInfo>>;
    fn commits_in_range(&self, range: &str, limit: usize) -> Result<Vec<CommitInfo>>;
    fn commit_diff(&self, hash: &str) -> Result<Vec<FileDiff>>;
    fn stash_list(&self) -> Result<Vec<StashInfo>>;
    fn branch_list(&self) -> Result<Vec<BranchInfo>>;

    /// Contents of `<reference>:<path>`; an empty reference reads the index.
    fn show_file(&self, reference: &str, path: &str) -> Result<String>;

    // Repo info; all absent rather than failing when unconfigured.
    fn current_branch(&self) -> Result<Option<String>>;
    fn upstream_ref(&self) -> Result<Option<String>>;
    fn push_remote_ref(&self) -> Result<Option<String>>;

    // Mutations; the output is returned structurally even on failure.
    fn stage_paths(&self, paths: &[PathBuf]) -> Result<CommandOutput>;
    fn unstage_paths(&self, paths: &[PathBuf]) -> Result<CommandOutput>;
    fn checkout_paths(&self, paths: &[PathBuf]) -> Result<CommandOutput>;
    fn delete_untracked(&self, paths: &[PathBuf]) -> Result<CommandOutput>;
    fn apply_patch(
        &self,
        patch: &str,
        location: ApplyLocation,
        reverse: bool,
    ) -> Result<CommandOutput>;

    /// Run an arbitrary git command built by the menu layer.
    fn run_command(&self, args: &[String]) -> Result<CommandOutput>;
}

pub trait GitBackend: Send + Sync {
    /// Open the repository containing `workdir`.
    fn open(&self, workdir: &Path) -> Result<Arc<dyn GitRepository>>;
}
