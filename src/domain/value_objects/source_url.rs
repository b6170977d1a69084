use std::fmt;
use thiserror::Error;
use url::Url;

use super::repository_name::RepositoryName;
use super::scm_type::ScmType;

/// SourceUrl related errors
#[derive(Debug, Error, PartialEq)]
pub enum SourceUrlError {
    #[error("Invalid source URL base '{base}': {reason}")]
    InvalidBase { base: String, reason: String },

    #[error("Source URL base '{0}' cannot carry credentials")]
    CannotEmbedCredentials(String),
}

/// URL of a repository on the source host, e.g.
/// `https://scm.example.org/scm/git/alpha`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl {
    url: Url,
}

impl SourceUrl {
    /// Build the source URL of `name` below `base` for the given kind
    pub fn for_repository(
        base: &str,
        scm_type: ScmType,
        name: &RepositoryName,
    ) -> Result<Self, SourceUrlError> {
        let mut url = Url::parse(base).map_err(|e| SourceUrlError::InvalidBase {
            base: base.to_string(),
            reason: e.to_string(),
        })?;

        url.path_segments_mut()
            .map_err(|_| SourceUrlError::InvalidBase {
                base: base.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push(scm_type.path_segment())
            .push(name.as_str());

        Ok(Self { url })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The same URL with username and password embedded (percent-encoded).
    ///
    /// The returned string contains the password; never log it.
    pub fn with_credentials(&self, username: &str, password: &str) -> Result<String, SourceUrlError> {
        let mut url = self.url.clone();
        url.set_username(username)
            .map_err(|_| SourceUrlError::CannotEmbedCredentials(self.url.to_string()))?;
        url.set_password(Some(password))
            .map_err(|_| SourceUrlError::CannotEmbedCredentials(self.url.to_string()))?;
        Ok(url.to_string())
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
