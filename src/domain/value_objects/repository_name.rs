use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// RepositoryName related errors
#[derive(Debug, Error, PartialEq)]
pub enum RepositoryNameError {
    #[error("Repository name is empty")]
    Empty,

    #[error("Repository name '{0}' is a relative path component")]
    RelativeComponent(String),

    #[error("Repository name '{0}' contains a path separator")]
    ContainsSeparator(String),

    #[error("Repository name contains a NUL byte")]
    ContainsNul,
}

/// Name of a repository as listed on the remote host.
///
/// The same value names the local mirror directory and the last segment of
/// the source URL, so it must be a single path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validate and wrap a repository name
    pub fn new(name: &str) -> Result<Self, RepositoryNameError> {
        if name.is_empty() {
            return Err(RepositoryNameError::Empty);
        }
        if name == "." || name == ".." {
            return Err(RepositoryNameError::RelativeComponent(name.to_string()));
        }
        if name.contains('\0') {
            return Err(RepositoryNameError::ContainsNul);
        }
        if name.contains('/') || name.contains('\\') {
            return Err(RepositoryNameError::ContainsSeparator(name.to_string()));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name starts with the given reserved prefix
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Path of this repository's mirror below `root`
    pub fn local_path(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for RepositoryName {
    type Error = RepositoryNameError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl TryFrom<String> for RepositoryName {
    type Error = RepositoryNameError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(&name)
    }
}

impl From<RepositoryName> for String {
    fn from(name: RepositoryName) -> Self {
        name.0
    }
}

impl AsRef<str> for RepositoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
