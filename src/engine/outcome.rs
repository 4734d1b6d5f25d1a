//! Results of a navigation request.

use crate::core::NavigationPhase;

/// How a navigation request ended.
///
/// None of these are errors. A denied guard, a superseded request and an
/// unmatched path are ordinary outcomes that simply carry no payload.
#[derive(Clone, Debug, PartialEq)]
pub enum NavigationOutcome<P> {
    /// A route matched and was committed.
    Committed(P),
    /// Nothing matched; the fallback was committed.
    FallbackCommitted(P),
    /// The matched route's guard denied the navigation.
    Cancelled,
    /// A newer navigation started while this one awaited its guard.
    Superseded,
    /// The host refused the history update; nothing was published.
    Rejected,
    /// Nothing matched and no fallback is set, or there is no host
    /// location to navigate.
    Unmatched,
}

impl<P> NavigationOutcome<P> {
    /// Phase the navigation finished in.
    pub fn phase(&self) -> NavigationPhase {
        match self {
            Self::Committed(_) => NavigationPhase::Committed,
            Self::FallbackCommitted(_) => NavigationPhase::FallbackCommitted,
            Self::Cancelled => NavigationPhase::Cancelled,
            Self::Superseded => NavigationPhase::Superseded,
            Self::Rejected => NavigationPhase::Rejected,
            Self::Unmatched => NavigationPhase::Idle,
        }
    }

    pub fn payload(&self) -> Option<&P> {
        match self {
            Self::Committed(payload) | Self::FallbackCommitted(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn into_payload(self) -> Option<P> {
        match self {
            Self::Committed(payload) | Self::FallbackCommitted(payload) => Some(payload),
            _ => None,
        }
    }

    /// Whether history and reactive state were updated.
    pub fn is_commit(&self) -> bool {
        self.phase().is_commit()
    }
}
