/// Local file system access: configuration files and mirror directories
pub mod config_store;
pub mod local_state;

pub use config_store::ConfigStore;
pub use local_state::LocalStateProber;
