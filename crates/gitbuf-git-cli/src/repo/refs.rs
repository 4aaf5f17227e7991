use super::CliRepo;
use gitbuf_core::services::Result;

impl CliRepo {
    /// The short symbolic name of HEAD; absent in detached-HEAD state.
    pub(super) fn current_branch_impl(&self) -> Result<Option<String>> {
        let output = self.runner().run(&["symbolic-ref", "--short", "HEAD"]);
        if !output.ok() {
            return Ok(None);
        }
        let name = output.stdout.trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }

    fn config_get(&self, key: &str) -> Option<String> {
        let output = self.runner().run(&["config", "--get", key]);
        if !output.ok() {
            return None;
        }
        let value = output.stdout.trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    /// `<branch.remote>/<branch.merge minus refs/heads/>`, absent when
    /// either config key is missing.
    pub(super) fn upstream_ref_impl(&self) -> Result<Option<String>> {
        let Some(branch) = self.current_branch_impl()? else {
            return Ok(None);
        };
        let Some(remote) = self.config_get(&format!("branch.{branch}.remote")) else {
            return Ok(None);
        };
        let Some(merge) = self.config_get(&format!("branch.{branch}.merge")) else {
            return Ok(None);
        };
        let merge = merge.strip_prefix("refs/heads/").unwrap_or(&merge);
        Ok(Some(format!("{remote}/{merge}")))
    }

    /// The remote a bare `git push` would use, resolved by the cascade
    /// `branch.<b>.pushRemote` -> `remote.pushDefault` -> `branch.<b>.remote`.
    pub(super) fn push_remote_ref_impl(&self) -> Result<Option<String>> {
        let Some(branch) = self.current_branch_impl()? else {
            return Ok(None);
        };
        let remote = self
            .config_get(&format!("branch.{branch}.pushRemote"))
            .or_else(|| self.config_get("remote.pushDefault"))
            .or_else(|| self.config_get(&format!("branch.{branch}.remote")));
        Ok(remote.map(|remote| format!("{remote}/{branch}")))
    }
}
