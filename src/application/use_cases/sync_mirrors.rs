use colored::Colorize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::common::result::MirrorResult;
use crate::domain::entities::mirror_config::MirrorConfig;
use crate::domain::entities::sync_report::{RunReport, SyncAction, SyncResult};
use crate::domain::value_objects::{
    local_mirror_state::LocalMirrorState, repository_name::RepositoryName, scm_type::ScmType,
    source_url::SourceUrl,
};
use crate::infrastructure::filesystem::LocalStateProber;
use crate::infrastructure::process::ProcessRunner;
use crate::infrastructure::remote::RemoteEnumerator;
use crate::infrastructure::scm::{MirrorEngine, PhaseError, ScmFactory};

/// Synchronize every remote repository of one kind into the local mirror root.
///
/// Enumeration failure aborts the run. Anything that goes wrong for a single
/// repository is recorded in the report and the run moves on to the next one.
pub struct SyncMirrorsUseCase {
    config: Arc<MirrorConfig>,
    scm_type: ScmType,
    runner: Arc<dyn ProcessRunner>,
    progress: bool,
}

impl SyncMirrorsUseCase {
    pub fn new(
        config: Arc<MirrorConfig>,
        scm_type: ScmType,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            config,
            scm_type,
            runner,
            progress: true,
        }
    }

    /// Print per-repository status lines on stdout (on by default)
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub async fn execute(&self) -> MirrorResult<RunReport> {
        let mut report = RunReport::new(self.scm_type, self.config.host.as_str());

        self.status(format!(
            "{} Enumerating {} repositories from {}",
            "::".blue().bold(),
            self.scm_type.display_name(),
            self.config.host
        ));
        let enumerator = RemoteEnumerator::new(self.config.clone(), self.runner.clone());
        let names = enumerator.enumerate(self.scm_type).await?;
        self.status(format!(
            "{} Directory listing from {} succeeded, {} repositories found",
            "✓".green().bold(),
            self.config.host,
            names.len()
        ));

        let engine =
            ScmFactory::create_engine(self.scm_type, self.config.clone(), self.runner.clone());
        let prober = LocalStateProber::new(self.config.local_root(self.scm_type));

        for name in names {
            let result = self.synchronize_one(engine.as_ref(), &prober, &name).await;
            report.record(name, result);
        }

        report.finish();
        info!(
            synchronized = report.synchronized_count(),
            failed = report.failed_count(),
            "{} run finished",
            self.scm_type
        );
        Ok(report)
    }

    /// Probe, dispatch and classify one repository; never fails
    pub async fn synchronize_one(
        &self,
        engine: &dyn MirrorEngine,
        prober: &LocalStateProber,
        name: &RepositoryName,
    ) -> SyncResult {
        let path = prober.path_for(name);
        let state = prober.inspect(name, engine);

        if self.progress {
            println!();
        }
        match state {
            LocalMirrorState::Absent => self.status(format!(
                "{} First time synchronization on new project {}",
                "::".blue().bold(),
                name
            )),
            _ => self.status(format!("{} Synchronizing {}...", "::".blue().bold(), name)),
        }
        if let Ok(url) =
            SourceUrl::for_repository(&self.config.source_url_base(), self.scm_type, name)
        {
            self.status(format!("   Remote URL is {}", url));
        }

        match engine.synchronize(name, &path, state).await {
            Ok(action) => {
                self.status(format!(
                    "{} Project {} synchronized successfully!",
                    "✓".green().bold(),
                    name
                ));
                SyncResult::Synchronized { action }
            }
            Err(error) => {
                let result = SyncResult::Failed {
                    phase: error.phase,
                    attempted: planned_action(state),
                    detail: error.detail(),
                };
                report_failure(name, &error, result.failed_after_bootstrap());
                warn!("{}: {}", name, error);
                result
            }
        }
    }

    fn status(&self, line: String) {
        if self.progress {
            println!("{}", line);
        }
    }
}

fn planned_action(state: LocalMirrorState) -> Option<SyncAction> {
    match state {
        LocalMirrorState::Absent => Some(SyncAction::Bootstrapped),
        LocalMirrorState::Present => Some(SyncAction::Updated),
        LocalMirrorState::Invalid => None,
    }
}

/// Failure block on stderr: phase, status, command and everything captured
fn report_failure(name: &RepositoryName, error: &PhaseError, after_bootstrap: bool) {
    let phase = if after_bootstrap {
        format!("{} (initial sync after bootstrap)", error.phase)
    } else {
        error.phase.to_string()
    };

    eprintln!(
        "{} Project {} failed to sync during {}",
        "Error:".red().bold(),
        name,
        phase
    );
    eprintln!("  {}", error.message);
    if let Some(status) = error.exit_status {
        eprintln!("  Exit status: {}", status);
    }
    if let Some(command) = &error.command {
        eprintln!("  Command: {}", command);
    }
    eprintln!("  Process Output: {}", error.stdout_lines.join(" "));
    eprintln!("  Error Output: {}", error.stderr_lines.join(" "));
}
