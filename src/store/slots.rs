//! The router's published state.

use super::observable::Observable;
use crate::core::{Params, QueryParams, UrlParts};
use serde::{Deserialize, Serialize};
use url::Url;

/// The current route as seen by the UI layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteDescriptor<P> {
    pub path: String,
    /// `None` until something has been committed.
    pub payload: Option<P>,
    pub params: Params,
}

impl<P> Default for RouteDescriptor<P> {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            payload: None,
            params: Params::new(),
        }
    }
}

/// Raw host location, markers included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    pub pathname: String,
    /// `?`-prefixed query string, or empty
    pub search: String,
    /// `#`-prefixed fragment, or empty
    pub hash: String,
}

impl Default for LocationSnapshot {
    fn default() -> Self {
        Self {
            pathname: "/".to_string(),
            search: String::new(),
            hash: String::new(),
        }
    }
}

impl LocationSnapshot {
    /// Snapshot an absolute href. Unparseable input yields the default.
    pub fn from_href(href: &str) -> Self {
        let Ok(url) = Url::parse(href) else {
            return Self::default();
        };
        let marked = |marker: char, part: Option<&str>| match part {
            Some(value) if !value.is_empty() => format!("{marker}{value}"),
            _ => String::new(),
        };
        Self {
            pathname: url.path().to_string(),
            search: marked('?', url.query()),
            hash: marked('#', url.fragment()),
        }
    }

    /// Snapshot decomposed parts when the host has no location to read.
    pub fn from_parts(parts: &UrlParts) -> Self {
        let search = parts.query.to_query_string();
        Self {
            pathname: parts.pathname.clone(),
            search: if search.is_empty() {
                search
            } else {
                format!("?{search}")
            },
            hash: if parts.hash.is_empty() {
                String::new()
            } else {
                format!("#{}", parts.hash)
            },
        }
    }
}

/// Everything published by one commit.
#[derive(Clone, Debug)]
pub struct Commit<P> {
    pub location: LocationSnapshot,
    pub route: RouteDescriptor<P>,
    pub query: QueryParams,
    pub hash: String,
}

/// Observable slots the UI layer subscribes to.
///
/// A commit publishes every slot in one synchronous call, in a fixed
/// order: location, route, params, query, hash. A subscriber to an
/// earlier slot therefore still sees the previous values of the later
/// slots from inside its callback.
#[derive(Debug)]
pub struct RouterStore<P> {
    location: Observable<LocationSnapshot>,
    route: Observable<RouteDescriptor<P>>,
    params: Observable<Params>,
    query: Observable<QueryParams>,
    hash: Observable<String>,
}

impl<P: Clone> RouterStore<P> {
    pub fn new(location: LocationSnapshot) -> Self {
        Self {
            location: Observable::new(location),
            route: Observable::new(RouteDescriptor::default()),
            params: Observable::new(Params::new()),
            query: Observable::new(QueryParams::new()),
            hash: Observable::new(String::new()),
        }
    }

    pub fn location(&self) -> &Observable<LocationSnapshot> {
        &self.location
    }

    pub fn route(&self) -> &Observable<RouteDescriptor<P>> {
        &self.route
    }

    pub fn params(&self) -> &Observable<Params> {
        &self.params
    }

    pub fn query(&self) -> &Observable<QueryParams> {
        &self.query
    }

    pub fn hash(&self) -> &Observable<String> {
        &self.hash
    }

    /// Publish a full commit in slot order.
    pub fn publish(&self, commit: Commit<P>) {
        let params = commit.route.params.clone();
        self.location.set(commit.location);
        self.route.set(commit.route);
        self.params.set(params);
        self.query.set(commit.query);
        self.hash.set(commit.hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn snapshot_keeps_markers() {
        let snapshot = LocationSnapshot::from_href("http://localhost:3000/blog/42?tab=x#y");

        assert_eq!(snapshot.pathname, "/blog/42");
        assert_eq!(snapshot.search, "?tab=x");
        assert_eq!(snapshot.hash, "#y");
    }

    #[test]
    fn snapshot_of_invalid_href_is_default() {
        assert_eq!(LocationSnapshot::from_href("/relative"), LocationSnapshot::default());
    }

    #[test]
    fn snapshot_from_parts_adds_markers() {
        let parts = crate::core::decompose("/a?x=1#h", Some("http://localhost"));
        let snapshot = LocationSnapshot::from_parts(&parts);

        assert_eq!(snapshot.search, "?x=1");
        assert_eq!(snapshot.hash, "#h");
        assert_eq!(LocationSnapshot::from_parts(&UrlParts::default()), LocationSnapshot::default());
    }

    #[test]
    fn new_store_starts_empty() {
        let store: RouterStore<&str> = RouterStore::new(LocationSnapshot::default());

        assert_eq!(store.route().get(), RouteDescriptor::default());
        assert!(store.params().get().is_empty());
        assert!(store.query().get().is_empty());
        assert_eq!(store.hash().get(), "");
    }

    #[test]
    fn publish_follows_slot_order() {
        let store: Arc<RouterStore<&str>> = Arc::new(RouterStore::new(LocationSnapshot::default()));
        let order = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&order);
        store.location().subscribe(move |_| log.lock().unwrap().push("location"));
        let log = Arc::clone(&order);
        let view = Arc::clone(&store);
        store.route().subscribe(move |_| {
            // later slots have not been published yet
            assert_eq!(view.hash().get(), "");
            log.lock().unwrap().push("route");
        });
        let log = Arc::clone(&order);
        store.params().subscribe(move |_| log.lock().unwrap().push("params"));
        let log = Arc::clone(&order);
        store.query().subscribe(move |_| log.lock().unwrap().push("query"));
        let log = Arc::clone(&order);
        store.hash().subscribe(move |_| log.lock().unwrap().push("hash"));

        let mut params = Params::new();
        params.insert("id".to_string(), "42".to_string());
        store.publish(Commit {
            location: LocationSnapshot::from_href("http://localhost/blog/42#y"),
            route: RouteDescriptor {
                path: "/blog/42".to_string(),
                payload: Some("blog"),
                params,
            },
            query: QueryParams::new(),
            hash: "y".to_string(),
        });

        assert_eq!(
            *order.lock().unwrap(),
            vec!["location", "route", "params", "query", "hash"]
        );
        assert_eq!(store.params().get()["id"], "42");
        assert_eq!(store.hash().get(), "y");
    }
}
