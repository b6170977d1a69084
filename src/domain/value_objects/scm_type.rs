use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of repository being mirrored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScmType {
    /// Git, mirrored with `git clone --mirror` / `git fetch`
    Git,
    /// Subversion, mirrored with `svnsync`
    Svn,
}

impl fmt::Display for ScmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScmType::Git => write!(f, "git"),
            ScmType::Svn => write!(f, "svn"),
        }
    }
}

impl FromStr for ScmType {
    type Err = ScmTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "git" => Ok(ScmType::Git),
            "svn" | "subversion" => Ok(ScmType::Svn),
            _ => Err(ScmTypeError::UnsupportedScmType(s.to_string())),
        }
    }
}

impl ScmType {
    /// Directory name of this kind below the remote repository root, and the
    /// path segment used in source URLs (`https://host/scm/<segment>/<name>`)
    pub fn path_segment(&self) -> &'static str {
        match self {
            ScmType::Git => "git",
            ScmType::Svn => "svn",
        }
    }

    /// Names starting with this prefix are housekeeping entries at the remote
    /// root (the root itself shows up in the listing as its own base name)
    pub fn reserved_prefix(&self) -> &'static str {
        self.path_segment()
    }

    /// Human readable name used in status output
    pub fn display_name(&self) -> &'static str {
        match self {
            ScmType::Git => "Git",
            ScmType::Svn => "Subversion",
        }
    }
}

/// Errors that can occur when working with SCM types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScmTypeError {
    /// The specified SCM type is not supported
    UnsupportedScmType(String),
}

impl fmt::Display for ScmTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScmTypeError::UnsupportedScmType(scm) => {
                write!(f, "Unsupported SCM type: '{}'. Supported types are: git, svn", scm)
            }
        }
    }
}

impl std::error::Error for ScmTypeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scm_type_from_str() {
        assert_eq!("git".parse::<ScmType>().unwrap(), ScmType::Git);
        assert_eq!("GIT".parse::<ScmType>().unwrap(), ScmType::Git);
        assert_eq!("svn".parse::<ScmType>().unwrap(), ScmType::Svn);
        assert_eq!("subversion".parse::<ScmType>().unwrap(), ScmType::Svn);

        assert_eq!(
            "p4".parse::<ScmType>(),
            Err(ScmTypeError::UnsupportedScmType("p4".to_string()))
        );
    }

    #[test]
    fn test_scm_type_display() {
        assert_eq!(ScmType::Git.to_string(), "git");
        assert_eq!(ScmType::Svn.to_string(), "svn");
    }

    #[test]
    fn test_reserved_prefix_matches_remote_directory() {
        assert_eq!(ScmType::Git.reserved_prefix(), "git");
        assert_eq!(ScmType::Svn.reserved_prefix(), "svn");
        assert_eq!(ScmType::Git.path_segment(), ScmType::Git.reserved_prefix());
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&ScmType::Svn).unwrap();
        assert_eq!(json, "\"svn\"");

        let deserialized: ScmType = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, ScmType::Svn);
    }
}
