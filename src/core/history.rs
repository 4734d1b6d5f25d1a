//! Log of committed navigations.
//!
//! Provides immutable tracking of the paths the router has committed to,
//! following the same record-returns-new-log approach throughout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Path reported as "previous" before anything has been committed.
pub const INITIAL_PATH: &str = "/";

/// Identifier attached to every navigation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavigationId(Uuid);

impl NavigationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NavigationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NavigationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How a navigation reached the router.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationKind {
    /// Requested by the application; pushes a history entry.
    Push,
    /// Re-synchronised from a host location that already changed.
    Pop,
}

/// Record of a single committed navigation.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{NavigationId, NavigationKind, NavigationRecord};
/// use chrono::Utc;
///
/// let record = NavigationRecord {
///     id: NavigationId::new(),
///     from: "/".to_string(),
///     to: "/about".to_string(),
///     kind: NavigationKind::Push,
///     fallback: false,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, "/about");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationRecord {
    pub id: NavigationId,
    /// Pathname committed before this navigation
    pub from: String,
    /// Pathname committed by this navigation
    pub to: String,
    pub kind: NavigationKind,
    /// Whether the fallback payload was committed instead of a route
    pub fallback: bool,
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of committed navigations.
///
/// The log is immutable: [`record`](NavigationHistory::record) returns a
/// new log with the navigation appended.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{NavigationHistory, NavigationId, NavigationKind, NavigationRecord};
/// use chrono::Utc;
///
/// let history = NavigationHistory::new();
/// assert_eq!(history.last_path(), "/");
///
/// let history = history.record(NavigationRecord {
///     id: NavigationId::new(),
///     from: history.last_path().to_string(),
///     to: "/blog/42".to_string(),
///     kind: NavigationKind::Push,
///     fallback: false,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.last_path(), "/blog/42");
/// assert_eq!(history.path(), vec!["/", "/blog/42"]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NavigationHistory {
    records: Vec<NavigationRecord>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Record a navigation, returning a new log.
    pub fn record(&self, record: NavigationRecord) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        Self { records }
    }

    /// Record a navigation, keeping at most `limit` of the newest records.
    pub fn record_bounded(&self, record: NavigationRecord, limit: usize) -> Self {
        let mut next = self.record(record);
        if next.records.len() > limit {
            let excess = next.records.len() - limit;
            next.records.drain(..excess);
        }
        next
    }

    /// Record a navigation in place, keeping at most `limit` records.
    pub fn append(&mut self, record: NavigationRecord, limit: Option<usize>) {
        self.records.push(record);
        if let Some(limit) = limit {
            if self.records.len() > limit {
                let excess = self.records.len() - limit;
                self.records.drain(..excess);
            }
        }
    }

    /// Pathname of the most recent commit, or `"/"` if none yet.
    pub fn last_path(&self) -> &str {
        self.records
            .last()
            .map(|record| record.to.as_str())
            .unwrap_or(INITIAL_PATH)
    }

    /// Paths traversed: the first record's origin, then every destination.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(first) = self.records.first() {
            path.push(first.from.as_str());
        }
        for record in &self.records {
            path.push(record.to.as_str());
        }
        path
    }

    /// Time between the first and the last commit.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.first()?, self.records.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn records(&self) -> &[NavigationRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&NavigationRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
