use thiserror::Error;

/// Contract violations reported by sequence construction, slicing and cursor
/// movement.
///
/// These indicate caller bugs (inconsistent chunk bounds, counts that exceed
/// the window) and are reported eagerly through `Result`. Recoverable
/// "data not yet available" conditions are never reported through this type;
/// those come back as `Option`/`bool` so a streaming caller can buffer more
/// input and retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// An argument is inconsistent with the storage it refers to.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// A requested window or position falls outside the sequence bounds.
    #[error("requested window exceeds the sequence bounds")]
    OutOfRange,
}
