use std::path::{Path, PathBuf};
use tracing::debug;

use crate::common::error::MirrorError;
use crate::common::result::MirrorResult;
use crate::domain::entities::mirror_config::MirrorConfig;
use crate::domain::value_objects::scm_type::ScmType;
use crate::infrastructure::process::CommandExecutor;

/// Which command the preflight check is guarding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreflightTarget {
    Sync,
    Verify,
}

/// Checks run before any repository is touched
pub struct PreflightService;

impl PreflightService {
    /// Binaries a command needs for the given repository kind
    pub fn required_binaries(
        config: &MirrorConfig,
        scm_type: ScmType,
        target: PreflightTarget,
    ) -> Vec<PathBuf> {
        let binaries = &config.binaries;
        match (scm_type, target) {
            (ScmType::Git, PreflightTarget::Sync) => {
                vec![binaries.ssh.clone(), binaries.git.clone()]
            }
            (ScmType::Svn, PreflightTarget::Sync) => vec![
                binaries.ssh.clone(),
                binaries.svnsync.clone(),
                binaries.svnadmin.clone(),
                binaries.svnlook.clone(),
            ],
            (ScmType::Git, PreflightTarget::Verify) => vec![binaries.git.clone()],
            (ScmType::Svn, PreflightTarget::Verify) => vec![binaries.svnadmin.clone()],
        }
    }

    /// Fail unless every needed binary resolves and the local root is a directory
    pub fn check(
        config: &MirrorConfig,
        scm_type: ScmType,
        target: PreflightTarget,
    ) -> MirrorResult<()> {
        for binary in Self::required_binaries(config, scm_type, target) {
            let resolved = CommandExecutor::resolve_program(&binary).ok_or_else(|| {
                MirrorError::preflight_error(format!(
                    "{} not found, please check your installation",
                    binary.display()
                ))
            })?;
            debug!("Using {}", resolved.display());
        }

        Self::check_root(config.local_root(scm_type))
    }

    pub fn check_root(root: &Path) -> MirrorResult<()> {
        if !root.is_dir() {
            return Err(MirrorError::preflight_error(format!(
                "Repository root {} is not a directory",
                root.display()
            )));
        }
        Ok(())
    }
}
