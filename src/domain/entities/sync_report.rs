use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::domain::value_objects::{repository_name::RepositoryName, scm_type::ScmType};

/// Step of a mirror state machine. Failures record the step they happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    /// Inspecting the local mirror directory
    Probing,
    /// `git clone --mirror`
    Cloning,
    /// `git fetch`
    Fetching,
    /// `svnadmin create`
    Creating,
    /// Writing the pre-revprop-change hook
    HookInstalling,
    /// `svnsync init`
    Initializing,
    /// Reading `svn:sync-from-uuid` from revision 0
    IdentifierQuerying,
    /// `svnadmin setuuid`
    IdentifierSetting,
    /// `svnsync sync`
    Syncing,
}

impl SyncPhase {
    /// Whether this phase belongs to the first-time setup of a mirror
    pub fn is_bootstrap(&self) -> bool {
        matches!(
            self,
            SyncPhase::Cloning
                | SyncPhase::Creating
                | SyncPhase::HookInstalling
                | SyncPhase::Initializing
                | SyncPhase::IdentifierQuerying
                | SyncPhase::IdentifierSetting
        )
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncPhase::Probing => "probing",
            SyncPhase::Cloning => "cloning",
            SyncPhase::Fetching => "fetching",
            SyncPhase::Creating => "creating",
            SyncPhase::HookInstalling => "hook installing",
            SyncPhase::Initializing => "initializing",
            SyncPhase::IdentifierQuerying => "identifier querying",
            SyncPhase::IdentifierSetting => "identifier setting",
            SyncPhase::Syncing => "syncing",
        };
        f.write_str(name)
    }
}

/// What a successful synchronization did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    /// A new mirror was created and filled
    Bootstrapped,
    /// An existing mirror was brought up to date
    Updated,
}

/// Outcome of one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncResult {
    Synchronized { action: SyncAction },
    Failed {
        phase: SyncPhase,
        /// What the run tried to do; absent when the directory was rejected
        #[serde(skip_serializing_if = "Option::is_none")]
        attempted: Option<SyncAction>,
        detail: String,
    },
}

impl SyncResult {
    pub fn is_synchronized(&self) -> bool {
        matches!(self, SyncResult::Synchronized { .. })
    }

    pub fn failed_phase(&self) -> Option<SyncPhase> {
        match self {
            SyncResult::Failed { phase, .. } => Some(*phase),
            SyncResult::Synchronized { .. } => None,
        }
    }

    /// A new mirror was set up but its first sync failed
    pub fn failed_after_bootstrap(&self) -> bool {
        match self {
            SyncResult::Failed {
                phase,
                attempted: Some(SyncAction::Bootstrapped),
                ..
            } => !phase.is_bootstrap(),
            _ => false,
        }
    }
}

/// Result of one repository within a run
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryOutcome {
    pub name: RepositoryName,
    pub result: SyncResult,
}

/// Summary of a whole run, in enumeration order
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub scm: ScmType,
    pub host: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub repositories: Vec<RepositoryOutcome>,
}

impl RunReport {
    pub fn new(scm: ScmType, host: impl Into<String>) -> Self {
        Self {
            scm,
            host: host.into(),
            started_at: Utc::now(),
            finished_at: None,
            repositories: Vec::new(),
        }
    }

    pub fn record(&mut self, name: RepositoryName, result: SyncResult) {
        self.repositories.push(RepositoryOutcome { name, result });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn synchronized_count(&self) -> usize {
        self.repositories
            .iter()
            .filter(|outcome| outcome.result.is_synchronized())
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.repositories.len() - self.synchronized_count()
    }

    pub fn bootstrapped_count(&self) -> usize {
        self.repositories
            .iter()
            .filter(|outcome| {
                outcome.result
                    == SyncResult::Synchronized {
                        action: SyncAction::Bootstrapped,
                    }
            })
            .count()
    }

    pub fn result_for(&self, name: &str) -> Option<&SyncResult> {
        self.repositories
            .iter()
            .find(|outcome| outcome.name.as_str() == name)
            .map(|outcome| &outcome.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(value: &str) -> RepositoryName {
        RepositoryName::new(value).unwrap()
    }

    #[test]
    fn test_counts() {
        let mut report = RunReport::new(ScmType::Git, "scm.example.org");
        report.record(
            name("alpha"),
            SyncResult::Synchronized {
                action: SyncAction::Bootstrapped,
            },
        );
        report.record(
            name("beta"),
            SyncResult::Synchronized {
                action: SyncAction::Updated,
            },
        );
        report.record(
            name("gamma"),
            SyncResult::Failed {
                phase: SyncPhase::Fetching,
                attempted: Some(SyncAction::Updated),
                detail: "exit 128".to_string(),
            },
        );

        assert_eq!(report.synchronized_count(), 2);
        assert_eq!(report.bootstrapped_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(
            report.result_for("gamma").and_then(SyncResult::failed_phase),
            Some(SyncPhase::Fetching)
        );
        assert!(report.result_for("delta").is_none());
    }

    #[test]
    fn test_bootstrap_phases() {
        assert!(SyncPhase::Cloning.is_bootstrap());
        assert!(SyncPhase::IdentifierSetting.is_bootstrap());
        assert!(!SyncPhase::Syncing.is_bootstrap());
        assert!(!SyncPhase::Fetching.is_bootstrap());
        assert!(!SyncPhase::Probing.is_bootstrap());
    }

    #[test]
    fn test_failed_after_bootstrap() {
        let failed = |phase, attempted| SyncResult::Failed {
            phase,
            attempted,
            detail: String::new(),
        };

        let bootstrapped = Some(SyncAction::Bootstrapped);
        assert!(failed(SyncPhase::Syncing, bootstrapped).failed_after_bootstrap());
        assert!(failed(SyncPhase::Fetching, bootstrapped).failed_after_bootstrap());
        assert!(!failed(SyncPhase::Initializing, bootstrapped).failed_after_bootstrap());
        assert!(!failed(SyncPhase::Syncing, Some(SyncAction::Updated)).failed_after_bootstrap());
        assert!(!failed(SyncPhase::Probing, None).failed_after_bootstrap());
        assert!(!SyncResult::Synchronized {
            action: SyncAction::Bootstrapped
        }
        .failed_after_bootstrap());
    }

    #[test]
    fn test_serialize_result() {
        let failed = SyncResult::Failed {
            phase: SyncPhase::HookInstalling,
            attempted: Some(SyncAction::Bootstrapped),
            detail: "permission denied".to_string(),
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["phase"], "hook_installing");
        assert_eq!(json["attempted"], "bootstrapped");

        let rejected = SyncResult::Failed {
            phase: SyncPhase::Probing,
            attempted: None,
            detail: "manual intervention required".to_string(),
        };
        let json = serde_json::to_value(&rejected).unwrap();
        assert!(json.get("attempted").is_none());

        let ok = SyncResult::Synchronized {
            action: SyncAction::Updated,
        };
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "synchronized");
        assert_eq!(json["action"], "updated");
    }
}
