//! Checkpoint error types.

use thiserror::Error;

/// Errors raised while saving or resuming a session history.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Encoding to JSON or binary failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Decoding from JSON or binary failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The cursor does not point at an entry
    #[error("Cursor {cursor} is out of range for {entries} history entries")]
    CursorOutOfRange { cursor: usize, entries: usize },

    /// Restoring into a host of a different origin
    #[error("Checkpoint origin '{found}' does not match host origin '{expected}'")]
    OriginMismatch { expected: String, found: String },
}
