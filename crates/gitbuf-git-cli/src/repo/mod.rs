use crate::process_log::ProcessLog;
use crate::runner::GitRunner;
use gitbuf_core::domain::{
    BranchInfo, CommitInfo, DiffArea, FileDiff, StashInfo, StatusSnapshot,
};
use gitbuf_core::services::{ApplyLocation, CommandOutput, GitRepository, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod log;
mod porcelain;
mod refs;
mod status;

pub(crate) struct CliRepo {
    root: PathBuf,
    runner: GitRunner,
}

impl CliRepo {
    pub(crate) fn new(root: PathBuf, log: Arc<ProcessLog>) -> Self {
        let runner = GitRunner::new(Some(root.clone()), log);
        Self { root, runner }
    }

    pub(crate) fn runner(&self) -> &GitRunner {
        &self.runner
    }
}

impl GitRepository for CliRepo {
    fn root(&self) -> &Path {
        &self.root
    }

    fn status_snapshot(&self) -> Result<StatusSnapshot> {
        self.status_snapshot_impl()
    }

    fn diff_files(&self, area: DiffArea) -> Result<Vec<FileDiff>> {
        self.diff_files_impl(area)
    }

    fn recent_commits(&self, limit: usize) -> Result<Vec<CommitInfo>> {
        self.recent_commits_impl(limit)
    }

    fn commits_in_range(&self, range: &str, limit: usize) -> Result<Vec<CommitInfo>> {
        self.commits_in_range_impl(range, limit)
    }

    fn commit_diff(&self, hash: &str) -> Result<Vec<FileDiff>> {
        self.commit_diff_impl(hash)
    }

    fn stash_list(&self) -> Result<Vec<StashInfo>> {
        self.stash_list_impl()
    }

    fn branch_list(&self) -> Result<Vec<BranchInfo>> {
        self.branch_list_impl()
    }

    fn show_file(&self, reference: &str, path: &str) -> Result<String> {
        self.show_file_impl(reference, path)
    }

    fn current_branch(&self) -> Result<Option<String>> {
        self.current_branch_impl()
    }

    fn upstream_ref(&self) -> Result<Option<String>> {
        self.upstream_ref_impl()
    }

    fn push_remote_ref(&self) -> Result<Option<String>> {
        self.push_remote_ref_impl()
    }

    fn stage_paths(&self, paths: &[PathBuf]) -> Result<CommandOutput> {
        self.stage_paths_impl(paths)
    }

    fn unstage_paths(&self, paths: &[PathBuf]) -> Result<CommandOutput> {
        self.unstage_paths_impl(paths)
    }

    fn checkout_paths(&self, paths: &[PathBuf]) -> Result<CommandOutput> {
        self.checkout_paths_impl(paths)
    }

    fn delete_untracked(&self, paths: &[PathBuf]) -> Result<CommandOutput> {
        self.delete_untracked_impl(paths)
    }

    fn apply_patch(
        &self,
        patch: &str,
        location: ApplyLocation,
        reverse: bool,
    ) -> Result<CommandOutput> {
        self.apply_patch_impl(patch, location, reverse)
    }

    fn run_command(&self, args: &[String]) -> Result<CommandOutput> {
        Ok(self.runner.run(args))
    }
}
