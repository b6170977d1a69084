use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::common::error::MirrorError;
use crate::common::result::MirrorResult;
use crate::domain::entities::mirror_config::MirrorConfig;
use crate::domain::value_objects::scm_type::ScmType;
use crate::infrastructure::process::{
    echo_lines, CommandInvocation, ProcessOutcome, ProcessRunner,
};

/// Verification result of one local mirror
#[derive(Debug, Clone, Serialize)]
pub struct VerificationOutcome {
    pub name: String,
    pub path: PathBuf,
    pub verified: bool,
    /// Why verification failed
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyReport {
    pub repositories: Vec<VerificationOutcome>,
}

impl VerifyReport {
    pub fn verified_count(&self) -> usize {
        self.repositories.iter().filter(|r| r.verified).count()
    }

    pub fn failed_count(&self) -> usize {
        self.repositories.len() - self.verified_count()
    }
}

/// Integrity check of every mirror under the local root.
///
/// Git mirrors get an optional `git gc` (whose failure is only reported)
/// followed by `git fsck`; Subversion mirrors get `svnadmin verify`.
pub struct VerifyMirrorsUseCase {
    config: Arc<MirrorConfig>,
    scm_type: ScmType,
    runner: Arc<dyn ProcessRunner>,
    gc: bool,
}

impl VerifyMirrorsUseCase {
    pub fn new(
        config: Arc<MirrorConfig>,
        scm_type: ScmType,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            config,
            scm_type,
            runner,
            gc: false,
        }
    }

    pub fn with_gc(mut self, gc: bool) -> Self {
        self.gc = gc;
        self
    }

    /// Directories directly under `root`, sorted by name
    pub fn list_mirrors(root: &Path) -> MirrorResult<Vec<PathBuf>> {
        let mut mirrors = Vec::new();
        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf);
                match e.into_io_error() {
                    Some(source) => MirrorError::filesystem_error_with_source(
                        format!("Cannot list {}", root.display()),
                        path,
                        source,
                    ),
                    None => MirrorError::internal_error(format!(
                        "Cannot list {}",
                        root.display()
                    )),
                }
            })?;
            if entry.file_type().is_dir() {
                mirrors.push(entry.into_path());
            }
        }
        Ok(mirrors)
    }

    pub fn gc_invocation(&self, path: &Path) -> CommandInvocation {
        CommandInvocation::new(&self.config.binaries.git)
            .arg("--git-dir")
            .path_arg(path)
            .arg("gc")
    }

    pub fn check_invocation(&self, path: &Path) -> CommandInvocation {
        match self.scm_type {
            ScmType::Git => CommandInvocation::new(&self.config.binaries.git)
                .arg("--git-dir")
                .path_arg(path)
                .arg("fsck"),
            ScmType::Svn => CommandInvocation::new(&self.config.binaries.svnadmin)
                .arg("verify")
                .path_arg(path),
        }
    }

    pub async fn execute(&self) -> MirrorResult<VerifyReport> {
        let root = self.config.local_root(self.scm_type);
        println!(
            "{} Getting list of repositories at {}...",
            "::".blue().bold(),
            root.display()
        );
        let mirrors = Self::list_mirrors(root)?;

        let mut report = VerifyReport::default();
        for path in mirrors {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!();
            println!("{} Verifying {}...", "::".blue().bold(), name);

            let outcome = self.verify_one(&path).await;
            if outcome.verified {
                println!("{} {} verified successfully!", "✓".green().bold(), name);
            } else {
                eprintln!("{} {} failed to verify.", "✗".red().bold(), name);
            }
            report.repositories.push(outcome);
        }
        Ok(report)
    }

    async fn verify_one(&self, path: &Path) -> VerificationOutcome {
        if self.gc && self.scm_type == ScmType::Git {
            let gc = self.gc_invocation(path);
            let outcome = self.runner.run(&gc).await;
            if outcome.accepted {
                debug!("git gc completed for {}", path.display());
            } else {
                warn!(
                    "git gc failed for {} with return code {}, continuing with the integrity check",
                    path.display(),
                    outcome.exit_status
                );
            }
        }

        let check = self.check_invocation(path);
        let outcome = self.runner.run(&check).await;
        echo_lines(
            self.config.echo,
            outcome.stdout_lines.iter().chain(&outcome.stderr_lines),
        );

        VerificationOutcome {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            verified: outcome.accepted,
            detail: (!outcome.accepted).then(|| failure_detail(&check, &outcome)),
        }
    }
}

fn failure_detail(invocation: &CommandInvocation, outcome: &ProcessOutcome) -> String {
    let mut detail = format!(
        "{} failed with return code {}",
        invocation.display(),
        outcome.exit_status
    );
    if let Some(line) = outcome.stderr_lines.iter().rev().find(|l| !l.trim().is_empty()) {
        detail.push_str(": ");
        detail.push_str(line.trim());
    }
    detail
}
