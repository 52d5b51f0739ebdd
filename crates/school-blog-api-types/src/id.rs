use std::fmt;

/// A document arrived with neither `_id` nor `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingIdError(pub &'static str);

impl fmt::Display for MissingIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has neither `_id` nor `id`", self.0)
    }
}

impl std::error::Error for MissingIdError {}

/// First non-empty identifier among the spellings the service may send.
///
/// Documents serialized with virtuals carry both `_id` and `id` holding the
/// same value, so either may be present alone or together.
pub(crate) fn first_id<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|id| !id.trim().is_empty())
}

pub(crate) fn require_id<const N: usize>(
    kind: &'static str,
    candidates: [Option<String>; N],
) -> Result<String, MissingIdError> {
    first_id(candidates).ok_or(MissingIdError(kind))
}
