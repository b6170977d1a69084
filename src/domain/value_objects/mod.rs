pub mod local_mirror_state;
pub mod repository_name;
pub mod scm_type;
pub mod source_url;

pub use local_mirror_state::LocalMirrorState;
pub use repository_name::{RepositoryName, RepositoryNameError};
pub use scm_type::ScmType;
pub use source_url::SourceUrl;
