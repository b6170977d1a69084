use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::{PreflightService, PreflightTarget};
use crate::application::use_cases::SyncMirrorsUseCase;
use crate::domain::entities::mirror_config::{MirrorConfig, OutputEcho};
use crate::domain::entities::sync_report::{RunReport, SyncResult};
use crate::domain::value_objects::scm_type::ScmType;
use crate::infrastructure::process::{CommandExecutor, ExecutionConfig, ProcessRunner};
use crate::presentation::cli::OutputFormat;

/// Arguments of `mirrorsync sync`
#[derive(Debug, Clone, Args)]
pub struct SyncArgs {
    /// Repository kind to synchronize (git or svn)
    pub scm: ScmType,

    /// Source host, for the ssh listing and the source URLs
    #[arg(long, env = "MIRRORSYNC_HOST")]
    pub host: Option<String>,

    /// Account used for the ssh listing
    #[arg(long, env = "MIRRORSYNC_SSH_USER")]
    pub ssh_user: Option<String>,

    /// Username for the source repositories
    #[arg(short, long, env = "MIRRORSYNC_USERNAME")]
    pub username: Option<String>,

    /// Password for the source repositories
    #[arg(short, long, env = "MIRRORSYNC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Local directory holding the mirrors
    #[arg(short = 'd', long)]
    pub repo_root: Option<PathBuf>,

    /// Remote directory containing the git/ and svn/ repository roots
    #[arg(long)]
    pub remote_root: Option<String>,

    /// Kill external commands running longer than this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output format of the final report (text, json, yaml)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Handler for the sync command
pub struct SyncCommand {
    pub args: SyncArgs,
}

impl SyncCommand {
    pub fn new(args: SyncArgs) -> Self {
        Self { args }
    }

    /// Layer command line values over the loaded configuration
    pub fn apply_overrides(&self, mut config: MirrorConfig) -> MirrorConfig {
        let args = &self.args;
        if let Some(host) = &args.host {
            config.host = host.clone();
        }
        if let Some(ssh_user) = &args.ssh_user {
            config = config.with_ssh_user(ssh_user.as_str());
        }
        if let Some(username) = &args.username {
            config.credentials.username = username.clone();
        }
        if let Some(password) = &args.password {
            config.credentials.password = password.clone();
        }
        if let Some(root) = &args.repo_root {
            config = config.with_local_root(args.scm, root);
        }
        if let Some(remote_root) = &args.remote_root {
            config.remote_root = remote_root.clone();
        }
        if let Some(timeout) = args.timeout {
            config = config.with_command_timeout(timeout);
        }
        // stdout belongs to the report
        if !matches!(args.output, OutputFormat::Text) && config.echo == OutputEcho::Stdout {
            config = config.with_echo(OutputEcho::Stderr);
        }
        config
    }

    pub async fn execute(&self, config: MirrorConfig) -> Result<()> {
        let text_output = matches!(self.args.output, OutputFormat::Text);
        let config = self.apply_overrides(config);
        config.validate()?;
        PreflightService::check(&config, self.args.scm, PreflightTarget::Sync)?;

        let mut execution = ExecutionConfig::new();
        if let Some(timeout) = config.command_timeout() {
            execution = execution.with_timeout(timeout);
        }
        let runner: Arc<dyn ProcessRunner> = Arc::new(CommandExecutor::new(execution));

        let report = SyncMirrorsUseCase::new(Arc::new(config), self.args.scm, runner)
            .with_progress(text_output)
            .execute()
            .await?;

        match self.args.output {
            OutputFormat::Text => print_summary(&report),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&report)?),
        }
        Ok(())
    }
}

fn print_summary(report: &RunReport) {
    println!();
    println!(
        "{} {} synchronization completed!",
        "✓".green().bold(),
        report.scm.display_name()
    );
    println!("  Repositories synchronized: {}", report.synchronized_count());
    println!("  New mirrors bootstrapped: {}", report.bootstrapped_count());

    if report.failed_count() > 0 {
        println!(
            "{} {} repositories failed:",
            "⚠".yellow().bold(),
            report.failed_count()
        );
        for outcome in &report.repositories {
            if let SyncResult::Failed { phase, detail, .. } = &outcome.result {
                let after_bootstrap = if outcome.result.failed_after_bootstrap() {
                    ", initial sync after bootstrap"
                } else {
                    ""
                };
                println!(
                    "  {} ({}{}): {}",
                    outcome.name.as_str().bold(),
                    phase,
                    after_bootstrap,
                    detail.red()
                );
            }
        }
    }
}
