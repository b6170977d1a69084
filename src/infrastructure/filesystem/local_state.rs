use std::path::PathBuf;
use tracing::debug;

use crate::domain::value_objects::{
    local_mirror_state::LocalMirrorState, repository_name::RepositoryName,
};
use crate::infrastructure::scm::MirrorEngine;

/// Looks at the local mirror root of one repository kind
#[derive(Debug, Clone)]
pub struct LocalStateProber {
    root: PathBuf,
}

impl LocalStateProber {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<root>/<name>`
    pub fn path_for(&self, name: &RepositoryName) -> PathBuf {
        name.local_path(&self.root)
    }

    /// Classify the mirror path of `name`, letting `engine` judge an existing
    /// directory
    pub fn inspect(&self, name: &RepositoryName, engine: &dyn MirrorEngine) -> LocalMirrorState {
        let path = self.path_for(name);
        let state = if !path.exists() {
            LocalMirrorState::Absent
        } else if path.is_dir() && engine.is_mirror(&path) {
            LocalMirrorState::Present
        } else {
            LocalMirrorState::Invalid
        };

        debug!("{} is {}", path.display(), state);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::mirror_config::MirrorConfig;
    use crate::domain::value_objects::scm_type::ScmType;
    use crate::infrastructure::process::{CommandExecutor, ProcessRunner};
    use crate::infrastructure::scm::ScmFactory;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn engine(scm_type: ScmType) -> Arc<dyn MirrorEngine> {
        let runner: Arc<dyn ProcessRunner> = Arc::new(CommandExecutor::default());
        ScmFactory::create_engine(scm_type, Arc::new(MirrorConfig::new("localhost")), runner)
    }

    #[test]
    fn test_path_for_stays_under_root() {
        let prober = LocalStateProber::new("/repositories/git");
        let name = RepositoryName::new("alpha").unwrap();
        assert_eq!(prober.path_for(&name), PathBuf::from("/repositories/git/alpha"));
    }

    #[test]
    fn test_inspect_git_states() {
        let temp_dir = TempDir::new().unwrap();
        let prober = LocalStateProber::new(temp_dir.path());
        let engine = engine(ScmType::Git);

        let alpha = RepositoryName::new("alpha").unwrap();
        assert_eq!(prober.inspect(&alpha, engine.as_ref()), LocalMirrorState::Absent);

        git2::Repository::init_bare(prober.path_for(&alpha)).unwrap();
        assert_eq!(prober.inspect(&alpha, engine.as_ref()), LocalMirrorState::Present);

        let leftover = RepositoryName::new("leftover").unwrap();
        std::fs::create_dir(prober.path_for(&leftover)).unwrap();
        assert_eq!(
            prober.inspect(&leftover, engine.as_ref()),
            LocalMirrorState::Invalid
        );
    }

    #[test]
    fn test_inspect_interrupted_svn_bootstrap_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let prober = LocalStateProber::new(temp_dir.path());
        let beta = RepositoryName::new("beta").unwrap();

        // svnadmin create succeeded, nothing after it did
        let path = prober.path_for(&beta);
        std::fs::create_dir_all(path.join("db")).unwrap();
        std::fs::create_dir_all(path.join("hooks")).unwrap();
        std::fs::write(path.join("format"), "5\n").unwrap();

        assert_eq!(
            prober.inspect(&beta, engine(ScmType::Svn).as_ref()),
            LocalMirrorState::Invalid
        );
    }

    #[test]
    fn test_inspect_plain_file_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let prober = LocalStateProber::new(temp_dir.path());
        let name = RepositoryName::new("beta").unwrap();
        std::fs::write(prober.path_for(&name), "not a repository").unwrap();

        assert_eq!(
            prober.inspect(&name, engine(ScmType::Svn).as_ref()),
            LocalMirrorState::Invalid
        );
    }
}
