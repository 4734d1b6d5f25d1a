//! Pure building blocks of the router.
//!
//! This module contains the parts with no side effects:
//! - URL decomposition into pathname, query and hash
//! - Route patterns and path matching
//! - Guard predicates
//! - Navigation phases and the immutable navigation log
//!
//! Everything that touches history or reactive state lives in
//! [`crate::engine`].

mod address;
mod guard;
mod history;
mod pattern;
mod state;

pub use address::{compose, decompose, parts_of, QueryParams, UrlParts};
pub use guard::Guard;
pub use history::{
    NavigationHistory, NavigationId, NavigationKind, NavigationRecord, INITIAL_PATH,
};
pub use pattern::{
    match_path, normalize, Params, PatternIssue, RoutePattern, Segment, WILDCARD_PARAM,
};
pub use state::NavigationPhase;
