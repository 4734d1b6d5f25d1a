//! Ordered route table with first-match lookup.

use crate::core::{Guard, Params, RoutePattern};

/// Options accepted when registering a route.
#[derive(Clone, Debug, Default)]
pub struct RouteOptions {
    pub guard: Option<Guard>,
}

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consult `guard` before committing navigations to this route.
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }
}

/// A registered route. Immutable once added.
#[derive(Clone, Debug)]
pub struct RouteEntry<P> {
    pub pattern: RoutePattern,
    pub payload: P,
    pub guard: Option<Guard>,
}

/// Result of a successful lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult<P> {
    pub payload: P,
    pub params: Params,
}

/// Routes in registration order plus an optional fallback payload.
///
/// Lookup scans the entries in order and returns the first match, so a
/// later entry with an identical pattern is never reached.
///
/// # Example
///
/// ```rust
/// use waypoint::routing::RouteTable;
///
/// let mut table = RouteTable::new();
/// table.add_route("/", "home");
/// table.add_route("/blog/:id", "blog");
///
/// let found = table.lookup("/blog/42").unwrap();
/// assert_eq!(found.payload, "blog");
/// assert_eq!(found.params["id"], "42");
/// assert!(table.lookup("/nope").is_none());
/// ```
#[derive(Clone, Debug)]
pub struct RouteTable<P> {
    entries: Vec<RouteEntry<P>>,
    fallback: Option<P>,
}

impl<P> Default for RouteTable<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> RouteTable<P> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            fallback: None,
        }
    }

    /// Append a route without a guard.
    pub fn add_route(&mut self, pattern: &str, payload: P) {
        self.add_route_with(pattern, payload, RouteOptions::default());
    }

    /// Append a route. No deduplication is performed.
    pub fn add_route_with(&mut self, pattern: &str, payload: P, options: RouteOptions) {
        let pattern = RoutePattern::new(pattern);
        tracing::debug!(
            pattern = %pattern,
            guarded = options.guard.is_some(),
            position = self.entries.len(),
            "route added"
        );
        self.entries.push(RouteEntry {
            pattern,
            payload,
            guard: options.guard,
        });
    }

    /// Remove every route. The fallback is kept.
    pub fn clear_routes(&mut self) {
        self.entries.clear();
    }

    /// Replace the fallback payload.
    pub fn set_fallback(&mut self, payload: P) {
        self.fallback = Some(payload);
    }

    pub fn clear_fallback(&mut self) {
        self.fallback = None;
    }

    pub fn fallback(&self) -> Option<&P> {
        self.fallback.as_ref()
    }

    pub fn entries(&self) -> &[RouteEntry<P>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose pattern matches `path`, with its parameters.
    pub fn find(&self, path: &str) -> Option<(&RouteEntry<P>, Params)> {
        self.entries.iter().find_map(|entry| {
            let params = entry.pattern.matches(path);
            tracing::trace!(pattern = %entry.pattern, %path, matched = params.is_some(), "match attempt");
            params.map(|params| (entry, params))
        })
    }
}

impl<P: Clone> RouteTable<P> {
    /// Payload and parameters of the first matching route.
    pub fn lookup(&self, path: &str) -> Option<MatchResult<P>> {
        self.find(path).map(|(entry, params)| MatchResult {
            payload: entry.payload.clone(),
            params,
        })
    }

    /// Matching route's payload, else the fallback, else nothing.
    pub fn resolve_payload(&self, path: &str) -> Option<P> {
        self.lookup(path)
            .map(|found| found.payload)
            .or_else(|| self.fallback.clone())
    }
}
