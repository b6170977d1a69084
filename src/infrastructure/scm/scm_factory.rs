use super::git_mirror::GitMirror;
use super::scm_interface::MirrorEngine;
use super::svn_mirror::SvnMirror;
use crate::domain::entities::mirror_config::MirrorConfig;
use crate::domain::value_objects::scm_type::ScmType;
use crate::infrastructure::process::ProcessRunner;
use std::sync::Arc;

/// Factory for the per-kind mirror engines
pub struct ScmFactory;

impl ScmFactory {
    /// Create the mirror engine for the given repository kind
    pub fn create_engine(
        scm_type: ScmType,
        config: Arc<MirrorConfig>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Arc<dyn MirrorEngine> {
        match scm_type {
            ScmType::Git => Arc::new(GitMirror::new(config, runner)),
            ScmType::Svn => Arc::new(SvnMirror::new(config, runner)),
        }
    }
}
