use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use url::Url;

use super::scm_interface::{run_phase, MirrorEngine, PhaseError};
use crate::domain::entities::mirror_config::MirrorConfig;
use crate::domain::entities::sync_report::SyncPhase;
use crate::domain::value_objects::{
    repository_name::RepositoryName, scm_type::ScmType, source_url::SourceUrl,
};
use crate::infrastructure::process::{CommandInvocation, ProcessRunner};

/// Hook allowing svnsync to replicate revision properties
pub const PRE_REVPROP_CHANGE_HOOK: &str = "#!/bin/sh\nexit 0\n";

/// Revision 0 property where `svnsync init` records the source identifier
pub const SYNC_FROM_UUID_PROPERTY: &str = "svn:sync-from-uuid";

/// `svnsync init` exit status when the store is already a sync destination
pub const ALREADY_INITIALIZED_STATUS: i32 = 1;

/// Subversion mirrors maintained with svnsync.
///
/// A new mirror goes through create, hook install, init, identifier copy and
/// a first sync, stopping at the first step that fails. Nothing is rolled
/// back.
pub struct SvnMirror {
    config: Arc<MirrorConfig>,
    runner: Arc<dyn ProcessRunner>,
}

impl SvnMirror {
    pub fn new(config: Arc<MirrorConfig>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { config, runner }
    }

    pub fn source_url(
        &self,
        phase: SyncPhase,
        name: &RepositoryName,
    ) -> Result<SourceUrl, PhaseError> {
        SourceUrl::for_repository(&self.config.source_url_base(), ScmType::Svn, name)
            .map_err(|e| PhaseError::new(phase, e.to_string()))
    }

    /// `file://` URL of the local store
    pub fn destination_url(&self, phase: SyncPhase, path: &Path) -> Result<String, PhaseError> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| PhaseError::new(phase, e.to_string()))?
                .join(path)
        };

        Url::from_file_path(&absolute)
            .map(|url| url.to_string())
            .map_err(|_| {
                PhaseError::new(
                    phase,
                    format!("Cannot build a file URL for {}", absolute.display()),
                )
            })
    }

    pub fn hook_path(path: &Path) -> PathBuf {
        path.join("hooks").join("pre-revprop-change")
    }

    /// svnsync with credentials and the optional HTTP library override
    fn svnsync(&self, subcommand: &str) -> CommandInvocation {
        let credentials = &self.config.credentials;
        let mut invocation = CommandInvocation::new(&self.config.binaries.svnsync)
            .arg(subcommand)
            .arg("--non-interactive")
            .arg("--username")
            .arg(credentials.username.as_str())
            .arg("--password")
            .secret_arg(credentials.password.as_str());

        if let Some(library) = &self.config.svn.http_library {
            invocation = invocation.arg(format!(
                "--config-option=servers:global:http-library={}",
                library
            ));
        }
        invocation
    }

    pub fn sync_invocation(
        &self,
        name: &RepositoryName,
        path: &Path,
    ) -> Result<CommandInvocation, PhaseError> {
        let destination = self.destination_url(SyncPhase::Syncing, path)?;
        let source = self.source_url(SyncPhase::Syncing, name)?;
        Ok(self.svnsync("sync").arg(destination).arg(source.as_str()))
    }

    pub fn create_invocation(&self, path: &Path) -> CommandInvocation {
        CommandInvocation::new(&self.config.binaries.svnadmin)
            .arg("create")
            .path_arg(path)
    }

    pub fn init_invocation(
        &self,
        name: &RepositoryName,
        path: &Path,
    ) -> Result<CommandInvocation, PhaseError> {
        let destination = self.destination_url(SyncPhase::Initializing, path)?;
        let source = self.source_url(SyncPhase::Initializing, name)?;
        Ok(self
            .svnsync("init")
            .arg(destination)
            .arg(source.as_str())
            .accept_status(ALREADY_INITIALIZED_STATUS))
    }

    pub fn identifier_query_invocation(&self, path: &Path) -> CommandInvocation {
        CommandInvocation::new(&self.config.binaries.svnlook)
            .args(["propget", "--revprop", "-r0"])
            .path_arg(path)
            .arg(SYNC_FROM_UUID_PROPERTY)
    }

    pub fn identifier_set_invocation(&self, path: &Path, uuid: &str) -> CommandInvocation {
        CommandInvocation::new(&self.config.binaries.svnadmin)
            .arg("setuuid")
            .path_arg(path)
            .arg(uuid)
    }

    async fn install_hook(&self, path: &Path) -> Result<(), PhaseError> {
        let hook_path = Self::hook_path(path);
        let hook_error = |action: &str, e: std::io::Error| {
            PhaseError::new(
                SyncPhase::HookInstalling,
                format!("Failed to {} {}: {}", action, hook_path.display(), e),
            )
        };

        tokio::fs::write(&hook_path, PRE_REVPROP_CHANGE_HOOK)
            .await
            .map_err(|e| hook_error("write", e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&hook_path, std::fs::Permissions::from_mode(0o755))
                .await
                .map_err(|e| hook_error("make executable", e))?;
        }

        info!(phase = %SyncPhase::HookInstalling, "Installed {}", hook_path.display());
        Ok(())
    }

    async fn query_identifier(&self, path: &Path) -> Result<String, PhaseError> {
        let invocation = self.identifier_query_invocation(path);
        let outcome = run_phase(
            self.runner.as_ref(),
            SyncPhase::IdentifierQuerying,
            &invocation,
            self.config.echo,
        )
        .await?;

        let uuid = outcome.stdout_text().trim().to_string();
        if uuid.is_empty() {
            return Err(PhaseError::new(
                SyncPhase::IdentifierQuerying,
                format!(
                    "{} is not set on revision 0 of {}",
                    SYNC_FROM_UUID_PROPERTY,
                    path.display()
                ),
            ));
        }
        Ok(uuid)
    }
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

/// `svn:sync-from-uuid` is set and the store's own UUID matches it
fn identifier_copied(path: &Path) -> bool {
    let source = match revision_zero_property(path, SYNC_FROM_UUID_PROPERTY) {
        Some(uuid) => uuid,
        None => return false,
    };
    let local = std::fs::read_to_string(path.join("db").join("uuid")).unwrap_or_default();
    local.lines().next().map(str::trim) == Some(source.trim())
}

/// Read one revision 0 property straight from an FSFS store
fn revision_zero_property(path: &Path, property: &str) -> Option<String> {
    let revprops = path.join("db").join("revprops");
    let file = if revprops.join("0").is_dir() {
        revprops.join("0").join("0")
    } else {
        revprops.join("0")
    };
    let content = std::fs::read(file).ok()?;
    hash_dump_value(&content, property)
}

/// Look up `key` in a Subversion hash dump (`K <len>`, key, `V <len>`, value,
/// ..., `END`)
fn hash_dump_value(mut data: &[u8], key: &str) -> Option<String> {
    loop {
        let (header, rest) = split_line(data)?;
        let key_len = length_field(header, b"K ")?;
        let entry_key = rest.get(..key_len)?;
        let (header, rest) = split_line(rest.get(key_len + 1..)?)?;
        let value_len = length_field(header, b"V ")?;
        let value = rest.get(..value_len)?;

        if entry_key == key.as_bytes() {
            return Some(String::from_utf8_lossy(value).into_owned());
        }
        data = rest.get(value_len + 1..)?;
    }
}

fn split_line(data: &[u8]) -> Option<(&[u8], &[u8])> {
    let end = data.iter().position(|&b| b == b'\n')?;
    Some((&data[..end], &data[end + 1..]))
}

fn length_field(header: &[u8], tag: &[u8]) -> Option<usize> {
    std::str::from_utf8(header.strip_prefix(tag)?)
        .ok()?
        .parse()
        .ok()
}

#[async_trait]
impl MirrorEngine for SvnMirror {
    fn scm_type(&self) -> ScmType {
        ScmType::Svn
    }

    /// A store only counts as a mirror once every bootstrap step before the
    /// first sync left its mark: the hook is executable and the store carries
    /// the identifier recorded by `svnsync init`.
    fn is_mirror(&self, path: &Path) -> bool {
        path.join("format").is_file()
            && path.join("db").is_dir()
            && is_executable(&Self::hook_path(path))
            && identifier_copied(path)
    }

    async fn bootstrap(&self, name: &RepositoryName, path: &Path) -> Result<(), PhaseError> {
        let runner = self.runner.as_ref();
        let echo = self.config.echo;

        run_phase(runner, SyncPhase::Creating, &self.create_invocation(path), echo).await?;

        self.install_hook(path).await?;

        let init = self.init_invocation(name, path)?;
        let outcome = run_phase(runner, SyncPhase::Initializing, &init, echo).await?;
        if outcome.exit_status == ALREADY_INITIALIZED_STATUS {
            info!("{} is already a sync destination", path.display());
        }

        let uuid = self.query_identifier(path).await?;

        let set_uuid = self.identifier_set_invocation(path, &uuid);
        run_phase(runner, SyncPhase::IdentifierSetting, &set_uuid, echo).await?;

        self.update(name, path).await
    }

    async fn update(&self, name: &RepositoryName, path: &Path) -> Result<(), PhaseError> {
        let invocation = self.sync_invocation(name, path)?;
        run_phase(
            self.runner.as_ref(),
            SyncPhase::Syncing,
            &invocation,
            self.config.echo,
        )
        .await?;
        Ok(())
    }
}
