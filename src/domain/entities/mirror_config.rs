use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::common::error::MirrorError;
use crate::common::result::MirrorResult;
use crate::domain::value_objects::scm_type::ScmType;

/// Default remote directory holding one subdirectory per repository kind
pub const DEFAULT_REMOTE_ROOT: &str = "/var/lib/scm/repositories";

/// Where verbose mode echoes the captured output of external commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputEcho {
    #[default]
    Off,
    Stdout,
    /// Keeps stdout free for a machine readable report
    Stderr,
}

/// Username and password for the source host
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// Paths (or bare names resolved on `PATH`) of the external tools
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Binaries {
    pub ssh: PathBuf,
    pub git: PathBuf,
    pub svnsync: PathBuf,
    pub svnadmin: PathBuf,
    pub svnlook: PathBuf,
}

impl Default for Binaries {
    fn default() -> Self {
        Self {
            ssh: PathBuf::from("ssh"),
            git: PathBuf::from("git"),
            svnsync: PathBuf::from("svnsync"),
            svnadmin: PathBuf::from("svnadmin"),
            svnlook: PathBuf::from("svnlook"),
        }
    }
}

/// Git specific settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitSettings {
    /// Directory holding the local git mirrors
    pub local_root: PathBuf,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            local_root: PathBuf::from("/repositories/git"),
        }
    }
}

/// Subversion specific settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SvnSettings {
    /// Directory holding the local svnsync mirrors
    pub local_root: PathBuf,

    /// HTTP library passed to svnsync (`serf`, `neon`), if any
    pub http_library: Option<String>,
}

impl Default for SvnSettings {
    fn default() -> Self {
        Self {
            local_root: PathBuf::from("/repositories/svn"),
            http_library: None,
        }
    }
}

/// Immutable run configuration.
///
/// Built once (defaults, then the YAML file, then command line overrides) and
/// shared by reference with every component of a run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Source host, used for ssh and for source URLs
    pub host: String,

    /// Account used for the remote listing; the ssh default when unset
    pub ssh_user: Option<String>,

    pub credentials: Credentials,

    /// Remote directory containing the `git/` and `svn/` repository roots
    pub remote_root: String,

    /// Base of the source URLs, `https://<host>/scm` when unset
    pub source_url_base: Option<String>,

    /// Kill external commands running longer than this
    pub command_timeout_secs: Option<u64>,

    pub binaries: Binaries,

    pub git: GitSettings,

    pub svn: SvnSettings,

    /// Echo captured command output
    #[serde(skip)]
    pub echo: OutputEcho,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            ssh_user: None,
            credentials: Credentials::default(),
            remote_root: DEFAULT_REMOTE_ROOT.to_string(),
            source_url_base: None,
            command_timeout_secs: None,
            binaries: Binaries::default(),
            git: GitSettings::default(),
            svn: SvnSettings::default(),
            echo: OutputEcho::Off,
        }
    }
}

impl MirrorConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn with_ssh_user(mut self, ssh_user: impl Into<String>) -> Self {
        self.ssh_user = Some(ssh_user.into());
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_local_root(mut self, scm_type: ScmType, root: impl Into<PathBuf>) -> Self {
        match scm_type {
            ScmType::Git => self.git.local_root = root.into(),
            ScmType::Svn => self.svn.local_root = root.into(),
        }
        self
    }

    pub fn with_source_url_base(mut self, base: impl Into<String>) -> Self {
        self.source_url_base = Some(base.into());
        self
    }

    pub fn with_command_timeout(mut self, timeout_secs: u64) -> Self {
        self.command_timeout_secs = Some(timeout_secs);
        self
    }

    pub fn with_binaries(mut self, binaries: Binaries) -> Self {
        self.binaries = binaries;
        self
    }

    /// Verbose mode echoes command output on stdout
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.echo = if verbose {
            OutputEcho::Stdout
        } else {
            OutputEcho::Off
        };
        self
    }

    pub fn with_echo(mut self, echo: OutputEcho) -> Self {
        self.echo = echo;
        self
    }

    /// Local directory holding the mirrors of the given kind
    pub fn local_root(&self, scm_type: ScmType) -> &Path {
        match scm_type {
            ScmType::Git => &self.git.local_root,
            ScmType::Svn => &self.svn.local_root,
        }
    }

    /// Remote directory listed for the given kind, with a trailing slash so
    /// `find` descends into it even when it is a symlink
    pub fn remote_directory(&self, scm_type: ScmType) -> String {
        format!(
            "{}/{}/",
            self.remote_root.trim_end_matches('/'),
            scm_type.path_segment()
        )
    }

    /// `user@host`, or just the host when no ssh user is configured
    pub fn ssh_destination(&self) -> String {
        match &self.ssh_user {
            Some(user) if !user.is_empty() => format!("{}@{}", user, self.host),
            _ => self.host.clone(),
        }
    }

    pub fn source_url_base(&self) -> String {
        self.source_url_base
            .clone()
            .unwrap_or_else(|| format!("https://{}/scm", self.host))
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    /// Reject configurations that cannot possibly work
    pub fn validate(&self) -> MirrorResult<()> {
        if self.host.trim().is_empty() {
            return Err(MirrorError::config_error(
                "No source host configured (set `host` or pass --host)",
            ));
        }
        if self.credentials.username.is_empty() {
            return Err(MirrorError::config_error(
                "No username configured (set `credentials.username` or pass --username)",
            ));
        }
        if self.command_timeout_secs == Some(0) {
            return Err(MirrorError::config_error(
                "command_timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }
}
