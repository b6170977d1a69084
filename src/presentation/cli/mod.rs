pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use crate::common::error::{MirrorError, EXIT_UNEXPECTED};
use crate::domain::entities::mirror_config::MirrorConfig;
use crate::infrastructure::filesystem::ConfigStore;
use commands::{SyncArgs, SyncCommand, VerifyArgs, VerifyCommand};

/// Output format options for the run report
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// mirrorsync - keep local git and Subversion mirrors in sync with a remote SCM host
#[derive(Parser)]
#[command(name = "mirrorsync")]
#[command(about = "Keep local git and Subversion mirrors in sync with a remote SCM host")]
#[command(version, long_version = concat!(
    env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ", built ", env!("BUILD_DATE"), ")"
))]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file (YAML)
    #[arg(short, long, global = true, env = "MIRRORSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mirror every repository of one kind published by the source host
    Sync(SyncArgs),

    /// Check the integrity of the local mirrors
    Verify(VerifyArgs),
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    pub fn verbose(&self) -> bool {
        self.cli.verbose
    }

    pub fn no_color(&self) -> bool {
        self.cli.no_color
    }

    /// Run the selected command and return the process exit code
    pub async fn run(self) -> i32 {
        if self.cli.no_color {
            colored::control::set_override(false);
        }

        match self.handle_command().await {
            Ok(()) => 0,
            Err(e) => {
                report_error(&e);
                exit_code(&e)
            }
        }
    }

    async fn handle_command(&self) -> Result<()> {
        let config = self.load_config()?;
        match &self.cli.command {
            Commands::Sync(args) => SyncCommand::new(args.clone()).execute(config).await,
            Commands::Verify(args) => VerifyCommand::new(args.clone()).execute(config).await,
        }
    }

    /// Defaults, overlaid by the configuration file when one is given
    fn load_config(&self) -> Result<MirrorConfig> {
        let config = match &self.cli.config {
            Some(path) => ConfigStore::new(path).load()?,
            None => MirrorConfig::default(),
        };
        Ok(config.with_verbose(self.cli.verbose))
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Exit code of a failed run; errors that are not ours count as unexpected
pub fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<MirrorError>()
        .map(MirrorError::exit_code)
        .unwrap_or(EXIT_UNEXPECTED)
}

fn report_error(error: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {}", cause);
    }

    if let Some(MirrorError::EnumerationError {
        stdout_lines,
        stderr_lines,
        ..
    }) = error.downcast_ref::<MirrorError>()
    {
        eprintln!("  Process Output: {}", stdout_lines.join(" "));
        eprintln!("  Error Output: {}", stderr_lines.join(" "));
    }
}
