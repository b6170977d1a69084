/// Mirror engines for the supported repository kinds
///
/// Each engine knows how to bootstrap a new local mirror and how to update an
/// existing one. Engines only talk to the outside world through a
/// `ProcessRunner`.
pub mod git_mirror;
pub mod scm_factory;
pub mod scm_interface;
pub mod svn_mirror;

pub use git_mirror::GitMirror;
pub use scm_factory::ScmFactory;
pub use scm_interface::{MirrorEngine, PhaseError};
pub use svn_mirror::SvnMirror;
