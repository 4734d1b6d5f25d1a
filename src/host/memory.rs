//! In-memory session history.

use super::{Host, HostError};
use crate::checkpoint::{CheckpointError, HistoryCheckpoint, CHECKPOINT_VERSION};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

/// One session-history entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Absolute URL
    pub url: String,
    /// JSON text of the entry's state object
    pub state: String,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    fn new(url: &Url, state: &Value) -> Self {
        Self {
            url: url.to_string(),
            state: state.to_string(),
            recorded_at: Utc::now(),
        }
    }

    /// The entry's state object, `Null` if it cannot be parsed.
    pub fn state_value(&self) -> Value {
        serde_json::from_str(&self.state).unwrap_or(Value::Null)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Push,
    Replace,
}

/// A history mutation observed by a [`MemoryHost`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryOperation {
    pub kind: OperationKind,
    /// Absolute URL the entry was set to
    pub url: String,
}

#[derive(Debug)]
struct Session {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    operations: Vec<HistoryOperation>,
}

impl Session {
    fn current_url(&self) -> Option<Url> {
        self.entries
            .get(self.cursor)
            .and_then(|entry| Url::parse(&entry.url).ok())
    }
}

/// A browser-like session history kept in memory.
///
/// Entries after the cursor are discarded on push, like a browser does
/// after going back. Every push and replace is also appended to an
/// operation log so callers can inspect exactly what a router did.
///
/// # Example
///
/// ```rust
/// use waypoint::host::{empty_state, Host, MemoryHost, OperationKind};
///
/// let host = MemoryHost::new("http://localhost:3000/").unwrap();
/// host.push_state(&empty_state(), "/about?x=1").unwrap();
///
/// assert_eq!(host.href().as_deref(), Some("http://localhost:3000/about?x=1"));
/// assert_eq!(host.operations()[0].kind, OperationKind::Push);
///
/// assert!(host.back());
/// assert_eq!(host.href().as_deref(), Some("http://localhost:3000/"));
/// ```
#[derive(Debug)]
pub struct MemoryHost {
    origin: String,
    session: Mutex<Session>,
}

impl MemoryHost {
    /// Start a session whose only entry is `initial_url`.
    pub fn new(initial_url: &str) -> Result<Self, HostError> {
        let url = Url::parse(initial_url).map_err(|source| HostError::InvalidUrl {
            url: initial_url.to_string(),
            source,
        })?;
        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(HostError::OpaqueOrigin(initial_url.to_string()));
        }

        Ok(Self {
            origin: origin.ascii_serialization(),
            session: Mutex::new(Session {
                entries: vec![HistoryEntry::new(&url, &Value::Null)],
                cursor: 0,
                operations: Vec::new(),
            }),
        })
    }

    /// Rebuild a session from a checkpoint.
    pub fn from_checkpoint(checkpoint: HistoryCheckpoint) -> Result<Self, CheckpointError> {
        validate_checkpoint(&checkpoint)?;
        Ok(Self {
            origin: checkpoint.origin,
            session: Mutex::new(Session {
                entries: checkpoint.entries,
                cursor: checkpoint.cursor,
                operations: Vec::new(),
            }),
        })
    }

    /// Snapshot entries and cursor. The operation log is not included.
    pub fn checkpoint(&self) -> HistoryCheckpoint {
        let session = self.session.lock();
        HistoryCheckpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            origin: self.origin.clone(),
            entries: session.entries.clone(),
            cursor: session.cursor,
        }
    }

    /// Replace this session's entries and cursor with a checkpoint's.
    pub fn restore(&self, checkpoint: HistoryCheckpoint) -> Result<(), CheckpointError> {
        validate_checkpoint(&checkpoint)?;
        if checkpoint.origin != self.origin {
            return Err(CheckpointError::OriginMismatch {
                expected: self.origin.clone(),
                found: checkpoint.origin,
            });
        }
        let mut session = self.session.lock();
        session.entries = checkpoint.entries;
        session.cursor = checkpoint.cursor;
        Ok(())
    }

    /// Step back one entry. Returns `false` at the start of the session.
    pub fn back(&self) -> bool {
        self.go(-1)
    }

    /// Step forward one entry. Returns `false` at the end of the session.
    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Move the cursor by `delta` entries if the target exists.
    pub fn go(&self, delta: isize) -> bool {
        let mut session = self.session.lock();
        let Some(target) = session.cursor.checked_add_signed(delta) else {
            return false;
        };
        if target >= session.entries.len() {
            return false;
        }
        session.cursor = target;
        true
    }

    pub fn current(&self) -> HistoryEntry {
        let session = self.session.lock();
        session.entries[session.cursor].clone()
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.session.lock().entries.clone()
    }

    pub fn cursor(&self) -> usize {
        self.session.lock().cursor
    }

    pub fn operations(&self) -> Vec<HistoryOperation> {
        self.session.lock().operations.clone()
    }

    pub fn clear_operations(&self) {
        self.session.lock().operations.clear();
    }

    fn apply(&self, kind: OperationKind, state: &Value, url: &str) -> Result<(), HostError> {
        let mut session = self.session.lock();
        let target = session
            .current_url()
            .ok_or(url::ParseError::RelativeUrlWithoutBase)
            .and_then(|base| base.join(url))
            .map_err(|source| HostError::Unresolvable {
                url: url.to_string(),
                source,
            })?;
        if target.origin().ascii_serialization() != self.origin {
            tracing::warn!(%url, origin = %self.origin, "cross-origin history update refused");
            return Err(HostError::CrossOrigin {
                url: target.to_string(),
                origin: self.origin.clone(),
            });
        }

        let entry = HistoryEntry::new(&target, state);
        match kind {
            OperationKind::Push => {
                let keep = session.cursor + 1;
                session.entries.truncate(keep);
                session.entries.push(entry);
                session.cursor = session.entries.len() - 1;
            }
            OperationKind::Replace => {
                let cursor = session.cursor;
                session.entries[cursor] = entry;
            }
        }
        session.operations.push(HistoryOperation {
            kind,
            url: target.to_string(),
        });
        Ok(())
    }
}

impl Host for MemoryHost {
    fn origin(&self) -> Option<String> {
        Some(self.origin.clone())
    }

    fn href(&self) -> Option<String> {
        let session = self.session.lock();
        session.entries.get(session.cursor).map(|entry| entry.url.clone())
    }

    fn push_state(&self, state: &Value, url: &str) -> Result<(), HostError> {
        self.apply(OperationKind::Push, state, url)
    }

    fn replace_state(&self, state: &Value, url: &str) -> Result<(), HostError> {
        self.apply(OperationKind::Replace, state, url)
    }
}

fn validate_checkpoint(checkpoint: &HistoryCheckpoint) -> Result<(), CheckpointError> {
    if checkpoint.version != CHECKPOINT_VERSION {
        return Err(CheckpointError::UnsupportedVersion {
            found: checkpoint.version,
            supported: CHECKPOINT_VERSION,
        });
    }
    if checkpoint.cursor >= checkpoint.entries.len() {
        return Err(CheckpointError::CursorOutOfRange {
            cursor: checkpoint.cursor,
            entries: checkpoint.entries.len(),
        });
    }
    Ok(())
}
