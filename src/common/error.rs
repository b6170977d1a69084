use std::path::PathBuf;
use thiserror::Error;

/// Exit code for a failed preflight check (missing tool, root directory or configuration).
pub const EXIT_PREFLIGHT: i32 = -1;

/// Exit code for a failed remote enumeration.
pub const EXIT_ENUMERATION: i32 = -2;

/// Exit code for anything else that aborts a run.
pub const EXIT_UNEXPECTED: i32 = -3;

/// Errors that abort a whole run.
///
/// Per-repository failures never surface here; they are recorded as
/// [`crate::domain::entities::sync_report::SyncResult::Failed`] instead.
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Preflight check failed: {message}")]
    PreflightError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Failed to list remote directories on {host} with return code {exit_status}")]
    EnumerationError {
        host: String,
        exit_status: i32,
        stdout_lines: Vec<String>,
        stderr_lines: Vec<String>,
    },

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Serialization error: {message}")]
    SerializationError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl MirrorError {
    pub fn preflight_error(message: impl Into<String>) -> Self {
        Self::PreflightError {
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: None,
        }
    }

    pub fn config_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn enumeration_error(
        host: impl Into<String>,
        exit_status: i32,
        stdout_lines: Vec<String>,
        stderr_lines: Vec<String>,
    ) -> Self {
        Self::EnumerationError {
            host: host.into(),
            exit_status,
            stdout_lines,
            stderr_lines,
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn serialization_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Process exit code scripting consumers can rely on.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::PreflightError { .. } | Self::ConfigError { .. } => EXIT_PREFLIGHT,
            Self::EnumerationError { .. } => EXIT_ENUMERATION,
            _ => EXIT_UNEXPECTED,
        }
    }
}

impl From<std::io::Error> for MirrorError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}

impl From<serde_yaml::Error> for MirrorError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::serialization_error_with_source("YAML serialization failed", error)
    }
}

impl From<serde_json::Error> for MirrorError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization_error_with_source("JSON serialization failed", error)
    }
}
