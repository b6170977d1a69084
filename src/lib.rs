//! # mirrorsync - git and Subversion mirror synchronization
//!
//! `mirrorsync` keeps a directory of local mirrors in sync with the repositories
//! published by a remote SCM host. It lists the remote repositories over ssh,
//! then brings every local mirror from "absent" or "stale" to "synchronized".
//!
//! ## Features
//!
//! - **Git mirrors**: `git clone --mirror` on first sight, `git fetch` afterwards
//! - **Subversion mirrors**: full `svnsync` bootstrap (create, hook, init,
//!   identifier copy) followed by incremental `svnsync sync`
//! - **Failure isolation**: one broken repository never stops the others
//! - **Verification**: `git fsck` / `svnadmin verify` over the whole mirror root
//!
//! ## Quick Start
//!
//! 1. Create a configuration file (`mirrorsync.yaml`):
//!
//! ```yaml
//! host: scm.example.org
//! ssh_user: scmadmin
//! credentials:
//!   username: mirror
//! git:
//!   local_root: /repositories/git
//! svn:
//!   local_root: /repositories/svn
//! ```
//!
//! 2. Synchronize:
//!
//! ```bash
//! MIRRORSYNC_PASSWORD=... mirrorsync -c mirrorsync.yaml sync git
//! mirrorsync -c mirrorsync.yaml sync svn --output json
//! ```
//!
//! ## Exit codes
//!
//! Individual repository failures are reported but do not change the exit
//! code. Only whole-run failures do:
//!
//! - `-1`: preflight failure (missing binary, missing root, bad configuration)
//! - `-2`: the remote listing failed
//! - `-3`: anything else
//!
//! ## Architecture
//!
//! - [`domain`]: repository kinds, names, configuration and run reports
//! - [`application`]: the sync and verify workflows plus preflight checks
//! - [`infrastructure`]: process execution, remote listing, mirror engines
//! - [`presentation`]: CLI interface
//! - [`common`]: error handling
//!
//! ## Using the Library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mirrorsync::application::use_cases::SyncMirrorsUseCase;
//! use mirrorsync::domain::entities::mirror_config::{Credentials, MirrorConfig};
//! use mirrorsync::domain::value_objects::scm_type::ScmType;
//! use mirrorsync::infrastructure::process::CommandExecutor;
//!
//! # async fn example() -> mirrorsync::Result<()> {
//! let config = MirrorConfig::new("scm.example.org")
//!     .with_credentials(Credentials::new("mirror", "secret"));
//!
//! let report = SyncMirrorsUseCase::new(
//!     Arc::new(config),
//!     ScmType::Git,
//!     Arc::new(CommandExecutor::default()),
//! )
//! .execute()
//! .await?;
//!
//! println!("{} failed", report.failed_count());
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::MirrorError;
pub use crate::common::result::MirrorResult as Result;
