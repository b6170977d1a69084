//! Test fixtures for creating test data
//!
//! Configurations pointing at scratch directories, and pre-populated mirrors.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use mirrorsync::domain::entities::mirror_config::{Credentials, MirrorConfig};
use mirrorsync::domain::value_objects::scm_type::ScmType;

pub const HOST: &str = "scm.example.org";
pub const USERNAME: &str = "mirror";
pub const PASSWORD: &str = "p@ss:word";

/// UUID of the source repositories behind the scripted svnsync
pub const SOURCE_UUID: &str = "6f1c2b7e-0d4e-4b8a-9c1f-3a2b1c0d9e8f";

/// Revision properties file in Subversion's hash dump format
pub fn revprops(entries: &[(&str, &str)]) -> String {
    let mut dump = String::new();
    for (key, value) in entries {
        dump.push_str(&format!(
            "K {}\n{}\nV {}\n{}\n",
            key.len(),
            key,
            value.len(),
            value
        ));
    }
    dump.push_str("END\n");
    dump
}

pub fn revprops_path(store: &Path) -> PathBuf {
    store.join("db").join("revprops").join("0").join("0")
}

/// What `svnadmin create` leaves behind: an empty store with its own UUID
pub fn create_svn_store(path: &Path, with_hooks: bool) {
    std::fs::create_dir_all(revprops_path(path).parent().unwrap()).unwrap();
    if with_hooks {
        std::fs::create_dir_all(path.join("hooks")).unwrap();
    }
    std::fs::write(path.join("format"), "5\n").unwrap();
    std::fs::write(path.join("db").join("uuid"), "0d9e8f3a-local-store\n").unwrap();
    std::fs::write(
        revprops_path(path),
        revprops(&[("svn:date", "2026-10-18T08:00:00.000000Z")]),
    )
    .unwrap();
}

/// Scratch mirror root plus a configuration using it
pub struct MirrorFixture {
    pub temp_dir: TempDir,
    pub config: Arc<MirrorConfig>,
}

impl MirrorFixture {
    pub fn new(scm_type: ScmType) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = MirrorConfig::new(HOST)
            .with_ssh_user("scmadmin")
            .with_credentials(Credentials::new(USERNAME, PASSWORD))
            .with_local_root(scm_type, temp_dir.path());

        Self {
            temp_dir,
            config: Arc::new(config),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn mirror_path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Existing git mirror
    pub fn add_git_mirror(&self, name: &str) {
        git2::Repository::init_bare(self.mirror_path(name)).unwrap();
    }

    /// Fully bootstrapped Subversion mirror
    pub fn add_svn_mirror(&self, name: &str) {
        let path = self.mirror_path(name);
        create_svn_store(&path, true);

        let hook = path.join("hooks").join("pre-revprop-change");
        std::fs::write(&hook, "#!/bin/sh\nexit 0\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&hook, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        std::fs::write(
            revprops_path(&path),
            revprops(&[("svn:sync-from-uuid", SOURCE_UUID)]),
        )
        .unwrap();
        std::fs::write(path.join("db").join("uuid"), format!("{}\n", SOURCE_UUID)).unwrap();
    }

    /// Store left behind by a bootstrap that stopped right after creation
    pub fn add_partial_svn_store(&self, name: &str) {
        create_svn_store(&self.mirror_path(name), true);
    }

    /// Directory that is not a mirror of any kind
    pub fn add_leftover_directory(&self, name: &str) {
        let path = self.mirror_path(name);
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join("partial"), "interrupted clone").unwrap();
    }
}
