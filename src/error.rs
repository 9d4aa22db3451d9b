use thiserror::Error;

/// Alias for `core::result::Result<T, MerkleError>`.
pub type Result<T> = core::result::Result<T, MerkleError>;

/// Errors from Merkle path, accumulator and bundle operations.
///
/// These cover the textual marshalling layer only. Hash-family errors are
/// surfaced through the [`PathHasher::Error`](crate::PathHasher::Error)
/// associated type and propagate through the Merkle layer unchanged;
/// precondition violations (depth mismatches, out-of-range indices) panic.
#[derive(Debug, Error)]
pub enum MerkleError {
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("unexpected end of stream")]
    UnexpectedEof,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
