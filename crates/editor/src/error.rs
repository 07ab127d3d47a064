use thiserror::Error;

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors raised when a cursor or selection does not fit the buffer
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EditorError {
    /// Offset lies past the end of the buffer
    #[error("Offset {offset} is out of bounds (len={len})")]
    OutOfBounds { offset: usize, len: usize },

    /// Offset splits a multi-byte character
    #[error("Offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },

    /// Selection end precedes its start
    #[error("Invalid selection: start={start}, end={end}")]
    InvalidSelection { start: usize, end: usize },
}
