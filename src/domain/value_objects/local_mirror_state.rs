use serde::Serialize;
use std::fmt;

/// What the local mirror root holds for one repository.
///
/// Computed fresh for every repository of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalMirrorState {
    /// No directory yet; the mirror has to be bootstrapped
    Absent,
    /// A usable mirror exists and only needs an incremental update
    Present,
    /// A directory exists but is not a mirror of the expected kind
    Invalid,
}

impl fmt::Display for LocalMirrorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalMirrorState::Absent => write!(f, "absent"),
            LocalMirrorState::Present => write!(f, "present"),
            LocalMirrorState::Invalid => write!(f, "invalid"),
        }
    }
}
