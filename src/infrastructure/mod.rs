/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - Process execution (output capture, timeouts, secret masking)
/// - Remote repository listing over ssh
/// - Mirror engines for git and Subversion
/// - File system access (configuration files, local mirror state)
pub mod filesystem;
pub mod process;
pub mod remote;
pub mod scm;

// Re-export commonly used types
pub use filesystem::{ConfigStore, LocalStateProber};
pub use process::{CommandExecutor, CommandInvocation, ProcessOutcome, ProcessRunner};
pub use remote::RemoteEnumerator;
pub use scm::{MirrorEngine, PhaseError, ScmFactory};
