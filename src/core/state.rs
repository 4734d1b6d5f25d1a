//! Phases of the navigation state machine.
//!
//! Each navigation starts `Idle`, moves to `Resolving` while the route is
//! looked up and any guard is awaited, and ends in one of the final
//! phases. A stale navigation overtaken by a newer one ends `Superseded`.

use serde::{Deserialize, Serialize};

/// Where the most recent navigation currently stands.
///
/// # Example
///
/// ```rust
/// use waypoint::core::NavigationPhase;
///
/// assert_eq!(NavigationPhase::Resolving.name(), "Resolving");
/// assert!(NavigationPhase::Committed.is_final());
/// assert!(NavigationPhase::Cancelled.is_final());
/// assert!(!NavigationPhase::Resolving.is_final());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationPhase {
    /// No navigation in flight, or the last one matched nothing.
    #[default]
    Idle,
    /// Route lookup and guard evaluation in progress.
    Resolving,
    /// A route was committed.
    Committed,
    /// The route's guard denied the navigation.
    Cancelled,
    /// Nothing matched and the fallback was committed.
    FallbackCommitted,
    /// A newer navigation started while this one awaited its guard.
    Superseded,
    /// The host refused the history update.
    Rejected,
}

impl NavigationPhase {
    pub fn name(&self) -> &str {
        match self {
            Self::Idle => "Idle",
            Self::Resolving => "Resolving",
            Self::Committed => "Committed",
            Self::Cancelled => "Cancelled",
            Self::FallbackCommitted => "FallbackCommitted",
            Self::Superseded => "Superseded",
            Self::Rejected => "Rejected",
        }
    }

    /// Whether the navigation has finished resolving.
    ///
    /// `Idle` counts as final: an unmatched navigation ends there.
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Resolving)
    }

    /// Whether history and reactive state were mutated.
    pub fn is_commit(&self) -> bool {
        matches!(self, Self::Committed | Self::FallbackCommitted)
    }
}
