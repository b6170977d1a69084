use crate::common::error::MirrorError;

/// Result alias used across the crate.
///
/// # Examples
///
/// ```
/// use mirrorsync::common::result::MirrorResult;
/// use mirrorsync::common::error::MirrorError;
///
/// fn example_with_error() -> MirrorResult<()> {
///     Err(MirrorError::internal_error("Something went wrong"))
/// }
/// assert!(example_with_error().is_err());
/// ```
pub type MirrorResult<T> = Result<T, MirrorError>;
