//! Mock services for testing
//!
//! `ScriptedRunner` stands in for the real process runner. It records every
//! invocation, answers from a script, and imitates the file system effects of
//! the commands that create mirrors so the state machines see what real
//! tools would leave behind. Unscripted commands succeed silently, except
//! `svnlook propget`, which reports the UUID recorded by an earlier
//! `svnsync init` on the same store.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::test_fixtures::{create_svn_store, revprops, revprops_path, SOURCE_UUID};
use mirrorsync::infrastructure::process::{CommandInvocation, ProcessOutcome, ProcessRunner};

/// One recorded invocation
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// e.g. `git clone`, `svnsync init`, `ssh`
    pub key: String,
    pub args: Vec<String>,
    /// Masked command line
    pub display: String,
}

#[derive(Debug, Clone)]
struct Response {
    key: String,
    repository: Option<String>,
    exit_status: i32,
    stdout: Vec<String>,
    stderr: Vec<String>,
}

/// Scripted fake of `ProcessRunner`
#[derive(Default)]
pub struct ScriptedRunner {
    responses: Mutex<Vec<Response>>,
    initialized_stores: Mutex<HashSet<PathBuf>>,
    stores_without_hooks: AtomicBool,
    calls: Mutex<Vec<RecordedCall>>,
}

/// `<program> <subcommand>`, or just `ssh` for the remote listing
pub fn command_key(invocation: &CommandInvocation) -> String {
    let program = invocation
        .program()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if program == "ssh" {
        return program;
    }

    match invocation
        .arguments()
        .into_iter()
        .find(|arg| !arg.starts_with('-') && !arg.contains('/'))
    {
        Some(subcommand) => format!("{} {}", program, subcommand),
        None => program,
    }
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remote listing answered with `entries`, one per line
    pub fn with_listing(self, entries: &[&str]) -> Self {
        self.on("ssh", 0, entries, &[])
    }

    /// Answer every `key` command
    pub fn on(self, key: &str, exit_status: i32, stdout: &[&str], stderr: &[&str]) -> Self {
        self.push(key, None, exit_status, stdout, stderr)
    }

    /// Answer `key` commands concerning one repository
    pub fn on_repository(
        self,
        key: &str,
        repository: &str,
        exit_status: i32,
        stdout: &[&str],
        stderr: &[&str],
    ) -> Self {
        self.push(key, Some(repository), exit_status, stdout, stderr)
    }

    /// `svnadmin create` leaves a store without a `hooks/` directory
    pub fn creating_stores_without_hooks(self) -> Self {
        self.stores_without_hooks.store(true, Ordering::SeqCst);
        self
    }

    fn push(
        self,
        key: &str,
        repository: Option<&str>,
        exit_status: i32,
        stdout: &[&str],
        stderr: &[&str],
    ) -> Self {
        self.responses.lock().unwrap().push(Response {
            key: key.to_string(),
            repository: repository.map(str::to_string),
            exit_status,
            stdout: lines(stdout),
            stderr: lines(stderr),
        });
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.key).collect()
    }

    pub fn calls_for(&self, key: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.key == key)
            .collect()
    }

    fn response_for(&self, key: &str, args: &[String]) -> Option<Response> {
        let concerns = |repository: &str| {
            let suffix = format!("/{}", repository);
            args.iter().any(|arg| arg.ends_with(&suffix))
        };

        self.responses
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|response| {
                response.key == key && response.repository.as_deref().map_or(true, concerns)
            })
            .cloned()
    }

    /// Default answer for commands nobody scripted
    fn unscripted(&self, key: &str, args: &[String]) -> (i32, Vec<String>, Vec<String>) {
        if key == "svnlook propget" {
            let initialized = args
                .iter()
                .any(|arg| self.initialized_stores.lock().unwrap().contains(Path::new(arg)));
            if initialized {
                return (0, vec![SOURCE_UUID.to_string()], Vec::new());
            }
        }
        (0, Vec::new(), Vec::new())
    }

    fn apply_effects(&self, key: &str, args: &[String]) {
        match key {
            "git clone" => {
                if let Some(path) = args.last() {
                    git2::Repository::init_bare(path).unwrap();
                }
            }
            "svnadmin create" => {
                if let Some(path) = args.last() {
                    let with_hooks = !self.stores_without_hooks.load(Ordering::SeqCst);
                    create_svn_store(Path::new(path), with_hooks);
                }
            }
            "svnsync init" => {
                let destination = args
                    .iter()
                    .find_map(|arg| url::Url::parse(arg).ok().filter(|u| u.scheme() == "file"))
                    .and_then(|url| url.to_file_path().ok());
                if let Some(path) = destination {
                    std::fs::write(
                        revprops_path(&path),
                        revprops(&[("svn:sync-from-uuid", SOURCE_UUID)]),
                    )
                    .unwrap();
                    self.initialized_stores.lock().unwrap().insert(path);
                }
            }
            "svnadmin setuuid" => {
                if let [_, path, uuid] = args {
                    let uuid_file = Path::new(path).join("db").join("uuid");
                    std::fs::write(uuid_file, format!("{}\n", uuid)).unwrap();
                }
            }
            _ => {}
        }
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, invocation: &CommandInvocation) -> ProcessOutcome {
        let key = command_key(invocation);
        let args: Vec<String> = invocation
            .arguments()
            .into_iter()
            .map(str::to_string)
            .collect();

        self.calls.lock().unwrap().push(RecordedCall {
            key: key.clone(),
            args: args.clone(),
            display: invocation.display(),
        });

        let (exit_status, stdout, stderr) = match self.response_for(&key, &args) {
            Some(response) => (response.exit_status, response.stdout, response.stderr),
            None => self.unscripted(&key, &args),
        };

        let accepted = invocation.is_accepted(exit_status);
        if exit_status == 0 {
            self.apply_effects(&key, &args);
        }

        ProcessOutcome::new(exit_status, stdout, stderr).with_accepted(accepted)
    }
}
