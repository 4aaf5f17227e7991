use super::CliRepo;
use gitbuf_core::error::{Error, ErrorKind};
use gitbuf_core::services::{ApplyLocation, CommandOutput, Result};
use std::path::PathBuf;
use std::time::Instant;

impl CliRepo {
    fn run_with_paths(&self, args: &[&str], paths: &[PathBuf]) -> CommandOutput {
        let mut full: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        full.push("--".to_string());

        let mut paths = paths.to_vec();
        paths.sort();
        paths.dedup();
        full.extend(paths.iter().map(|p| p.to_string_lossy().into_owned()));

        self.runner().run(&full)
    }

    pub(super) fn stage_paths_impl(&self, paths: &[PathBuf]) -> Result<CommandOutput> {
        Ok(self.run_with_paths(&["add"], paths))
    }

    pub(super) fn unstage_paths_impl(&self, paths: &[PathBuf]) -> Result<CommandOutput> {
        Ok(self.run_with_paths(&["restore", "--staged"], paths))
    }

    pub(super) fn checkout_paths_impl(&self, paths: &[PathBuf]) -> Result<CommandOutput> {
        Ok(self.run_with_paths(&["checkout"], paths))
    }

    /// Discarding an untracked file means deleting it from disk; git has
    /// nothing to restore.
    pub(super) fn delete_untracked_impl(&self, paths: &[PathBuf]) -> Result<CommandOutput> {
        let started = Instant::now();
        for path in paths {
            let full = self.root.join(path);
            std::fs::remove_file(&full).map_err(|e| Error::new(ErrorKind::Io(e.kind())))?;
        }
        Ok(CommandOutput {
            exit: 0,
            stdout: String::new(),
            stderr: String::new(),
            elapsed: started.elapsed(),
        })
    }

    pub(super) fn apply_patch_impl(
        &self,
        patch: &str,
        location: ApplyLocation,
        reverse: bool,
    ) -> Result<CommandOutput> {
        let mut args = vec!["apply"];
        if matches!(location, ApplyLocation::Index) {
            args.push("--cached");
        }
        if reverse {
            args.push("--reverse");
        }
        args.push("-");
        Ok(self.runner().run_with_input(patch, &args))
    }
}
