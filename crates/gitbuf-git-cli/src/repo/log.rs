use super::CliRepo;
use gitbuf_core::domain::{BranchInfo, CommitInfo, FileDiff, StashInfo};
use gitbuf_core::error::Error;
use gitbuf_core::parse;
use gitbuf_core::services::Result;

pub(super) const LOG_FORMAT: &str = "--format=%h%x00%s%x00%ar%x00%an%x00%D";

impl CliRepo {
    pub(super) fn recent_commits_impl(&self, limit: usize) -> Result<Vec<CommitInfo>> {
        let output = self
            .runner()
            .run(&["log", LOG_FORMAT, &format!("-{limit}")]);
        if !output.ok() {
            // An unborn branch has no log; treat it as empty rather than
            // failing the whole snapshot.
            return Ok(Vec::new());
        }
        Ok(parse::log(&output.stdout))
    }

    pub(super) fn commits_in_range_impl(&self, range: &str, limit: usize) -> Result<Vec<CommitInfo>> {
        let output = self
            .runner()
            .run(&["log", LOG_FORMAT, &format!("-{limit}"), range]);
        if !output.ok() {
            return Err(Error::backend(format!(
                "git log {range} failed: {}",
                output.first_error_line()
            )));
        }
        Ok(parse::log(&output.stdout))
    }

    pub(super) fn commit_diff_impl(&self, hash: &str) -> Result<Vec<FileDiff>> {
        let output = self.runner().run(&["show", "--format=", hash]);
        if !output.ok() {
            return Err(Error::backend(format!(
                "git show {hash} failed: {}",
                output.first_error_line()
            )));
        }
        Ok(parse::diff(&output.stdout))
    }

    pub(super) fn stash_list_impl(&self) -> Result<Vec<StashInfo>> {
        let output = self.runner().run(&["stash", "list"]);
        if !output.ok() {
            return Err(Error::backend(format!(
                "git stash list failed: {}",
                output.first_error_line()
            )));
        }
        Ok(parse::stash_list(&output.stdout))
    }

    pub(super) fn branch_list_impl(&self) -> Result<Vec<BranchInfo>> {
        let output = self.runner().run(&[
            "branch",
            "--list",
            "--all",
            "--format=%(refname:short)%00%(objectname:short)%00%(HEAD)",
        ]);
        if !output.ok() {
            return Err(Error::backend(format!(
                "git branch --list failed: {}",
                output.first_error_line()
            )));
        }
        Ok(parse::branch_list(&output.stdout))
    }

    pub(super) fn show_file_impl(&self, reference: &str, path: &str) -> Result<String> {
        let spec = format!("{reference}:{path}");
        let output = self.runner().run(&["show", &spec]);
        if !output.ok() {
            return Err(Error::backend(format!(
                "git show {spec} failed: {}",
                output.first_error_line()
            )));
        }
        Ok(output.stdout)
    }
}
