/// Discovery of the repositories published by the source host
pub mod enumerator;

pub use enumerator::{parse_listing, RemoteEnumerator};
