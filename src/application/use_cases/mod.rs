pub mod sync_mirrors;
pub mod verify_mirrors;

pub use sync_mirrors::SyncMirrorsUseCase;
pub use verify_mirrors::{VerificationOutcome, VerifyMirrorsUseCase, VerifyReport};
