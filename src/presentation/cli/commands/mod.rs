pub mod sync;
pub mod verify;

pub use sync::*;
pub use verify::*;
