use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::domain::entities::mirror_config::OutputEcho;
use crate::domain::entities::sync_report::{SyncAction, SyncPhase};
use crate::domain::value_objects::{
    local_mirror_state::LocalMirrorState, repository_name::RepositoryName, scm_type::ScmType,
};
use crate::infrastructure::process::{
    echo_lines, CommandInvocation, ProcessOutcome, ProcessRunner,
};

/// Common interface of the per-kind mirror state machines
#[async_trait]
pub trait MirrorEngine: Send + Sync {
    /// Get the SCM type this implementation handles
    fn scm_type(&self) -> ScmType;

    /// Check if an existing directory is a usable mirror of this kind
    fn is_mirror(&self, path: &Path) -> bool;

    /// Create a mirror at `path`, which must not exist yet
    async fn bootstrap(&self, name: &RepositoryName, path: &Path) -> Result<(), PhaseError>;

    /// Bring an existing mirror up to date
    async fn update(&self, name: &RepositoryName, path: &Path) -> Result<(), PhaseError>;

    /// Drive one repository to "synchronized" from the given local state
    async fn synchronize(
        &self,
        name: &RepositoryName,
        path: &Path,
        state: LocalMirrorState,
    ) -> Result<SyncAction, PhaseError> {
        match state {
            LocalMirrorState::Absent => {
                self.bootstrap(name, path).await?;
                Ok(SyncAction::Bootstrapped)
            }
            LocalMirrorState::Present => {
                self.update(name, path).await?;
                Ok(SyncAction::Updated)
            }
            LocalMirrorState::Invalid => Err(PhaseError::new(
                SyncPhase::Probing,
                format!(
                    "{} exists but is not a valid {} mirror; manual intervention required",
                    path.display(),
                    self.scm_type()
                ),
            )),
        }
    }
}

/// One step of a mirror state machine failed
#[derive(Debug, Clone, Error)]
#[error("{phase} failed: {message}")]
pub struct PhaseError {
    pub phase: SyncPhase,
    pub message: String,
    /// Masked command line, when the step ran a command
    pub command: Option<String>,
    pub exit_status: Option<i32>,
    pub stdout_lines: Vec<String>,
    pub stderr_lines: Vec<String>,
}

impl PhaseError {
    pub fn new(phase: SyncPhase, message: impl Into<String>) -> Self {
        Self {
            phase,
            message: message.into(),
            command: None,
            exit_status: None,
            stdout_lines: Vec::new(),
            stderr_lines: Vec::new(),
        }
    }

    /// Error for a command whose outcome was not accepted
    pub fn from_outcome(
        phase: SyncPhase,
        invocation: &CommandInvocation,
        outcome: &ProcessOutcome,
    ) -> Self {
        let program = invocation.program().display();
        let message = if outcome.timed_out {
            format!("{} timed out", program)
        } else {
            format!("{} failed with return code {}", program, outcome.exit_status)
        };

        Self {
            phase,
            message,
            command: Some(invocation.display()),
            exit_status: Some(outcome.exit_status),
            stdout_lines: outcome.stdout_lines.clone(),
            stderr_lines: outcome.stderr_lines.clone(),
        }
    }

    /// One-line summary kept in the run report
    pub fn detail(&self) -> String {
        match self.stderr_lines.iter().rev().find(|line| !line.trim().is_empty()) {
            Some(last) => format!("{}: {}", self.message, last.trim()),
            None => self.message.clone(),
        }
    }
}

/// Run one step's command and classify the outcome
pub(crate) async fn run_phase(
    runner: &dyn ProcessRunner,
    phase: SyncPhase,
    invocation: &CommandInvocation,
    echo: OutputEcho,
) -> Result<ProcessOutcome, PhaseError> {
    info!(%phase, "{}", invocation.display());
    let outcome = runner.run(invocation).await;

    if !outcome.accepted {
        return Err(PhaseError::from_outcome(phase, invocation, &outcome));
    }

    echo_lines(echo, outcome.stdout_lines.iter().chain(&outcome.stderr_lines));

    Ok(outcome)
}
