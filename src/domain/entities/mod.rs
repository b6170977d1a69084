pub mod mirror_config;
pub mod sync_report;

pub use mirror_config::{Binaries, Credentials, MirrorConfig, OutputEcho};
pub use sync_report::{RepositoryOutcome, RunReport, SyncAction, SyncPhase, SyncResult};
