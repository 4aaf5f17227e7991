use super::CliRepo;
use gitbuf_core::domain::{DiffArea, FileDiff, StatusSnapshot};
use gitbuf_core::error::Error;
use gitbuf_core::parse;
use gitbuf_core::services::Result;

impl CliRepo {
    pub(super) fn status_snapshot_impl(&self) -> Result<StatusSnapshot> {
        let output = self.runner().run(&["status", "--porcelain=v2", "--branch"]);
        if !output.ok() {
            return Err(Error::backend(format!(
                "git status failed: {}",
                output.first_error_line()
            )));
        }
        Ok(parse::status(&output.stdout))
    }

    pub(super) fn diff_files_impl(&self, area: DiffArea) -> Result<Vec<FileDiff>> {
        let args: &[&str] = match area {
            DiffArea::Unstaged => &["diff"],
            DiffArea::Staged => &["diff", "--cached"],
        };
        let output = self.runner().run(args);
        if !output.ok() {
            return Err(Error::backend(format!(
                "git diff failed: {}",
                output.first_error_line()
            )));
        }
        Ok(parse::diff(&output.stdout))
    }
}
