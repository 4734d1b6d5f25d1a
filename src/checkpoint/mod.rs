//! Checkpoint and resume for in-memory session history.
//!
//! A [`HistoryCheckpoint`] captures the entries and cursor of a
//! [`MemoryHost`](crate::host::MemoryHost) so a headless session can be
//! persisted and resumed later, as JSON or as a compact binary blob.

use crate::host::HistoryEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a session history.
///
/// # Example
///
/// ```rust
/// use waypoint::checkpoint::HistoryCheckpoint;
/// use waypoint::host::{empty_state, Host, MemoryHost};
///
/// let host = MemoryHost::new("http://localhost:3000/").unwrap();
/// host.push_state(&empty_state(), "/blog/42").unwrap();
///
/// let json = host.checkpoint().to_json().unwrap();
/// let resumed = MemoryHost::from_checkpoint(HistoryCheckpoint::from_json(&json).unwrap()).unwrap();
///
/// assert_eq!(resumed.href().as_deref(), Some("http://localhost:3000/blog/42"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryCheckpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub created_at: DateTime<Utc>,

    /// Serialized origin of the session
    pub origin: String,

    /// Every entry, oldest first
    pub entries: Vec<HistoryEntry>,

    /// Index of the current entry
    pub cursor: usize,
}

impl HistoryCheckpoint {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json).map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }
}
