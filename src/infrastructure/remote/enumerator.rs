use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::common::error::MirrorError;
use crate::common::result::MirrorResult;
use crate::domain::entities::mirror_config::MirrorConfig;
use crate::domain::value_objects::{repository_name::RepositoryName, scm_type::ScmType};
use crate::infrastructure::process::{echo_lines, CommandInvocation, ProcessRunner};

/// Lists the repositories of one kind on the source host over ssh
pub struct RemoteEnumerator {
    config: Arc<MirrorConfig>,
    runner: Arc<dyn ProcessRunner>,
}

impl RemoteEnumerator {
    pub fn new(config: Arc<MirrorConfig>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { config, runner }
    }

    /// `ssh -o BatchMode=yes <dest> find <root>/<kind>/ -maxdepth 1 -type d -exec basename {} \;`
    pub fn listing_invocation(&self, scm_type: ScmType) -> CommandInvocation {
        CommandInvocation::new(&self.config.binaries.ssh)
            .args(["-o", "BatchMode=yes"])
            .arg(self.config.ssh_destination())
            .arg("find")
            .arg(self.config.remote_directory(scm_type))
            .args(["-maxdepth", "1", "-type", "d", "-exec", "basename", "{}", "\\;"])
    }

    /// Remote repository names, in listing order
    pub async fn enumerate(&self, scm_type: ScmType) -> MirrorResult<Vec<RepositoryName>> {
        let invocation = self.listing_invocation(scm_type);
        info!("Listing {} repositories on {}", scm_type, self.config.host);

        let outcome = self.runner.run(&invocation).await;
        if !outcome.accepted {
            return Err(MirrorError::enumeration_error(
                self.config.host.as_str(),
                outcome.exit_status,
                outcome.stdout_lines,
                outcome.stderr_lines,
            ));
        }

        echo_lines(self.config.echo, &outcome.stdout_lines);

        let names = parse_listing(&outcome.stdout_lines, scm_type.reserved_prefix());
        debug!("Found {} {} repositories", names.len(), scm_type);
        Ok(names)
    }
}

/// Split a listing on whitespace and drop entries carrying the reserved prefix.
///
/// The listed directory itself shows up as its own basename (`git`, `svn`),
/// which the prefix filter removes along with housekeeping directories.
pub fn parse_listing(stdout_lines: &[String], reserved_prefix: &str) -> Vec<RepositoryName> {
    stdout_lines
        .iter()
        .flat_map(|line| line.split_whitespace())
        .filter_map(|entry| match RepositoryName::new(entry) {
            Ok(name) => Some(name),
            Err(e) => {
                warn!("Skipping remote entry '{}': {}", entry, e);
                None
            }
        })
        .filter(|name| !name.has_prefix(reserved_prefix))
        .collect()
}
