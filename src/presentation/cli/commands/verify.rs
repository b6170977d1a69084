use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::{PreflightService, PreflightTarget};
use crate::application::use_cases::VerifyMirrorsUseCase;
use crate::domain::entities::mirror_config::MirrorConfig;
use crate::domain::value_objects::scm_type::ScmType;
use crate::infrastructure::process::{CommandExecutor, ExecutionConfig, ProcessRunner};

/// Arguments of `mirrorsync verify`
#[derive(Debug, Clone, Args)]
pub struct VerifyArgs {
    /// Repository kind to verify (git or svn)
    pub scm: ScmType,

    /// Local directory holding the mirrors
    #[arg(short = 'd', long)]
    pub repo_root: Option<PathBuf>,

    /// Path of the git or svnadmin binary
    #[arg(short, long = "bin")]
    pub bin: Option<PathBuf>,

    /// Run `git gc` before checking each git mirror
    #[arg(long)]
    pub gc: bool,
}

/// Handler for the verify command
pub struct VerifyCommand {
    pub args: VerifyArgs,
}

impl VerifyCommand {
    pub fn new(args: VerifyArgs) -> Self {
        Self { args }
    }

    pub fn apply_overrides(&self, mut config: MirrorConfig) -> MirrorConfig {
        if let Some(root) = &self.args.repo_root {
            config = config.with_local_root(self.args.scm, root);
        }
        if let Some(bin) = &self.args.bin {
            match self.args.scm {
                ScmType::Git => config.binaries.git = bin.clone(),
                ScmType::Svn => config.binaries.svnadmin = bin.clone(),
            }
        }
        config
    }

    pub async fn execute(&self, config: MirrorConfig) -> Result<()> {
        let config = self.apply_overrides(config);
        PreflightService::check(&config, self.args.scm, PreflightTarget::Verify)?;

        let mut execution = ExecutionConfig::new();
        if let Some(timeout) = config.command_timeout() {
            execution = execution.with_timeout(timeout);
        }
        let runner: Arc<dyn ProcessRunner> = Arc::new(CommandExecutor::new(execution));
        let report = VerifyMirrorsUseCase::new(Arc::new(config), self.args.scm, runner)
            .with_gc(self.args.gc)
            .execute()
            .await?;

        println!();
        println!(
            "{} Verified {} of {} repositories",
            "✓".green().bold(),
            report.verified_count(),
            report.repositories.len()
        );
        if report.failed_count() > 0 {
            println!("{} Some repositories failed to verify:", "⚠".yellow().bold());
            for outcome in report.repositories.iter().filter(|r| !r.verified) {
                println!(
                    "  {}: {}",
                    outcome.name.bold(),
                    outcome.detail.as_deref().unwrap_or_default().red()
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: VerifyArgs,
    }

    #[test]
    fn test_bin_overrides_the_checked_binary() {
        let args = Harness::parse_from(["verify", "svn", "--bin", "/opt/svn/bin/svnadmin"]).args;
        let config = VerifyCommand::new(args).apply_overrides(MirrorConfig::default());
        assert_eq!(
            config.binaries.svnadmin,
            PathBuf::from("/opt/svn/bin/svnadmin")
        );
        assert_eq!(config.binaries.git, PathBuf::from("git"));
    }
}
