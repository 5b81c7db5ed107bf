//! The result-code taxonomy shared by every `dat-*` crate.
//!
//! Every public operation in `dat-core` returns a [`DatResult`]. The set
//! of variants is deliberately small, and none of them are fatal at this
//! layer — callers decide what to do with a failure.

/// A reason one of `dat-core`'s operations could not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DatError {
    /// A lookup (root by name, object by offset) found nothing.
    #[error("not found")]
    NotFound,
    /// A required handle or pointer argument was absent.
    #[error("null parameter passed")]
    NullParam,
    /// A buffer grow request could not be satisfied.
    #[error("allocation failed")]
    AllocationFailure,
    /// The caller's import buffer is shorter than the file's declared size.
    #[error("size is invalid")]
    InvalidSize,
    /// An offset argument violated the natural alignment of the operation.
    #[error("alignment is invalid")]
    InvalidAlignment,
    /// An offset or index fell outside the valid range.
    #[error("out of bounds")]
    OutOfBounds,
}

impl DatError {
    /// The human-readable string for this error.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DatError::NotFound => "not found",
            DatError::NullParam => "null parameter passed",
            DatError::AllocationFailure => "allocation failed",
            DatError::InvalidSize => "size is invalid",
            DatError::InvalidAlignment => "alignment is invalid",
            DatError::OutOfBounds => "out of bounds",
        }
    }
}

/// The result type returned by every public operation in `dat-core`.
pub type DatResult<T> = Result<T, DatError>;
