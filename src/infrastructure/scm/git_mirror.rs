use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use super::scm_interface::{run_phase, MirrorEngine, PhaseError};
use crate::domain::entities::mirror_config::MirrorConfig;
use crate::domain::entities::sync_report::SyncPhase;
use crate::domain::value_objects::{
    repository_name::RepositoryName, scm_type::ScmType, source_url::SourceUrl,
};
use crate::infrastructure::process::{CommandInvocation, ProcessRunner};

/// Git mirrors: `git clone --mirror` on first sight, `git fetch` afterwards
pub struct GitMirror {
    config: Arc<MirrorConfig>,
    runner: Arc<dyn ProcessRunner>,
}

impl GitMirror {
    pub fn new(config: Arc<MirrorConfig>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { config, runner }
    }

    /// Base git invocation; prompts would hang the run, so they are disabled
    fn git(&self) -> CommandInvocation {
        CommandInvocation::new(&self.config.binaries.git).env("GIT_TERMINAL_PROMPT", "0")
    }

    pub fn source_url(&self, name: &RepositoryName) -> Result<SourceUrl, PhaseError> {
        SourceUrl::for_repository(&self.config.source_url_base(), ScmType::Git, name)
            .map_err(|e| PhaseError::new(SyncPhase::Cloning, e.to_string()))
    }

    /// `git clone --mirror <url with credentials> <path>`
    pub fn clone_invocation(
        &self,
        name: &RepositoryName,
        path: &Path,
    ) -> Result<CommandInvocation, PhaseError> {
        let url = self.source_url(name)?;
        let credentials = &self.config.credentials;
        let url_with_credentials = url
            .with_credentials(&credentials.username, &credentials.password)
            .map_err(|e| PhaseError::new(SyncPhase::Cloning, e.to_string()))?;

        Ok(self
            .git()
            .arg("clone")
            .arg("--mirror")
            .arg_displayed_as(url_with_credentials, url.as_str())
            .path_arg(path))
    }

    /// `git -C <path> fetch -v`
    pub fn fetch_invocation(&self, path: &Path) -> CommandInvocation {
        self.git().arg("-C").path_arg(path).arg("fetch").arg("-v")
    }
}

#[async_trait]
impl MirrorEngine for GitMirror {
    fn scm_type(&self) -> ScmType {
        ScmType::Git
    }

    fn is_mirror(&self, path: &Path) -> bool {
        git2::Repository::open_bare(path)
            .map(|repo| repo.is_bare())
            .unwrap_or(false)
    }

    async fn bootstrap(&self, name: &RepositoryName, path: &Path) -> Result<(), PhaseError> {
        let invocation = self.clone_invocation(name, path)?;
        run_phase(
            self.runner.as_ref(),
            SyncPhase::Cloning,
            &invocation,
            self.config.echo,
        )
        .await?;
        Ok(())
    }

    async fn update(&self, _name: &RepositoryName, path: &Path) -> Result<(), PhaseError> {
        let invocation = self.fetch_invocation(path);
        run_phase(
            self.runner.as_ref(),
            SyncPhase::Fetching,
            &invocation,
            self.config.echo,
        )
        .await?;
        Ok(())
    }
}
