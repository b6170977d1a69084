pub mod preflight;

pub use preflight::{PreflightService, PreflightTarget};
