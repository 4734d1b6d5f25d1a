//! The navigation engine.

use super::outcome::NavigationOutcome;
use crate::config::RouterConfig;
use crate::core::{
    compose, decompose, NavigationHistory, NavigationId, NavigationKind, NavigationPhase,
    NavigationRecord, Params, QueryParams, UrlParts, INITIAL_PATH,
};
use crate::host::{empty_state, Host};
use crate::routing::{MatchResult, RouteOptions, RouteTable};
use crate::store::{Commit, LocationSnapshot, RouteDescriptor, RouterStore};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

/// Maps paths to payloads, runs guards, and keeps history and reactive
/// state in step.
///
/// A router is an ordinary value: construct one per application (or per
/// test) and share it by reference or `Arc`. All methods take `&self`.
///
/// # Concurrent navigations
///
/// The latest navigation wins. Every request takes a ticket when it
/// starts. Pushing history and publishing state happen together under a
/// commit lock, and a request whose ticket is no longer the latest by then
/// ends [`Superseded`](NavigationOutcome::Superseded) without touching
/// either. On a single-threaded executor a request with no guard to await
/// commits before returning control, so only guarded requests can be
/// superseded.
///
/// # Headless hosts
///
/// Without a host origin there is no location to navigate: `navigate` and
/// `navigate_to_current_url` return
/// [`Unmatched`](NavigationOutcome::Unmatched) and change nothing.
///
/// # Example
///
/// ```rust
/// use waypoint::engine::{NavigationOutcome, Router};
/// use waypoint::host::MemoryHost;
///
/// let router = Router::new(MemoryHost::new("http://localhost:3000/").unwrap());
/// router.add_route("/", "home");
/// router.add_route("/blog/:id", "blog");
/// router.set_fallback("not-found");
///
/// futures::executor::block_on(async {
///     let outcome = router.navigate("/blog/42?tab=x#y").await;
///     assert_eq!(outcome, NavigationOutcome::Committed("blog"));
///
///     let route = router.store().route().get();
///     assert_eq!(route.path, "/blog/42");
///     assert_eq!(route.params["id"], "42");
///     assert_eq!(router.store().hash().get(), "y");
///
///     let missing = router.navigate("/nope").await;
///     assert_eq!(missing, NavigationOutcome::FallbackCommitted("not-found"));
/// });
/// ```
pub struct Router<P, H> {
    table: RwLock<RouteTable<P>>,
    store: RouterStore<P>,
    host: H,
    log: Mutex<NavigationHistory>,
    last_path: Mutex<String>,
    phase: Mutex<NavigationPhase>,
    latest: AtomicU64,
    commit_lock: Mutex<()>,
    config: RouterConfig,
}

impl<P, H> Router<P, H>
where
    P: Clone + Send + Sync + 'static,
    H: Host,
{
    pub fn new(host: H) -> Self {
        Self::with_config(host, RouterConfig::default())
    }

    /// A zero `history_limit` is raised to one.
    pub fn with_config(host: H, mut config: RouterConfig) -> Self {
        if config.history_limit == Some(0) {
            tracing::warn!("history_limit of 0 raised to 1");
            config.history_limit = Some(1);
        }
        let location = host
            .href()
            .map(|href| LocationSnapshot::from_href(&href))
            .unwrap_or_default();

        Self {
            table: RwLock::new(RouteTable::new()),
            store: RouterStore::new(location),
            host,
            log: Mutex::new(NavigationHistory::new()),
            last_path: Mutex::new(INITIAL_PATH.to_string()),
            phase: Mutex::new(NavigationPhase::Idle),
            latest: AtomicU64::new(0),
            commit_lock: Mutex::new(()),
            config,
        }
    }

    pub(crate) fn from_parts(host: H, config: RouterConfig, table: RouteTable<P>) -> Self {
        let router = Self::with_config(host, config);
        *router.table.write() = table;
        router
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn store(&self) -> &RouterStore<P> {
        &self.store
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn add_route(&self, pattern: &str, payload: P) {
        self.table.write().add_route(pattern, payload);
    }

    pub fn add_route_with(&self, pattern: &str, payload: P, options: RouteOptions) {
        self.table.write().add_route_with(pattern, payload, options);
    }

    pub fn clear_routes(&self) {
        self.table.write().clear_routes();
    }

    pub fn set_fallback(&self, payload: P) {
        self.table.write().set_fallback(payload);
    }

    pub fn fallback(&self) -> Option<P> {
        self.table.read().fallback().cloned()
    }

    pub fn route_count(&self) -> usize {
        self.table.read().len()
    }

    /// First route matching `path`, without navigating.
    pub fn lookup(&self, path: &str) -> Option<MatchResult<P>> {
        self.table.read().lookup(path)
    }

    /// Phase of the most recent navigation that was not superseded.
    pub fn phase(&self) -> NavigationPhase {
        *self.phase.lock()
    }

    /// Snapshot of the committed-navigation log.
    pub fn history(&self) -> NavigationHistory {
        self.log.lock().clone()
    }

    /// Pathname guards receive as their "previous path".
    pub fn last_committed_path(&self) -> String {
        self.last_path.lock().clone()
    }

    /// Navigate to `target`, pushing a history entry on commit.
    pub async fn navigate(&self, target: &str) -> NavigationOutcome<P> {
        self.resolve(target, NavigationKind::Push).await
    }

    /// Re-synchronise with the host's current location.
    ///
    /// Called after the location already changed (back/forward), so a
    /// commit publishes state but never pushes history. Guards still run.
    pub async fn navigate_to_current_url(&self) -> NavigationOutcome<P> {
        let href = self
            .host
            .href()
            .unwrap_or_else(|| INITIAL_PATH.to_string());
        self.resolve(&href, NavigationKind::Pop).await
    }

    /// Navigate to `path` with a query string and hash appended.
    ///
    /// Empty `query` and `hash` leave their markers out of the URL.
    pub async fn goto(&self, path: &str, query: &QueryParams, hash: &str) -> NavigationOutcome<P> {
        let target = compose(path, query, hash);
        self.navigate(&target).await
    }

    /// Change the current query string without navigating.
    ///
    /// When `replace` is false the updates are merged: `None` and empty
    /// values remove their key, anything else sets it. When `replace` is
    /// true the existing query is discarded and only the non-empty updates
    /// are kept. The history entry is always replaced, never pushed, and
    /// only the query slot is republished. Without a host location this
    /// does nothing.
    pub fn update_query_params<I, K, V>(&self, updates: I, replace: bool)
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let Some(href) = self.host.href() else {
            tracing::trace!("no host location, query update skipped");
            return;
        };
        let mut url = match Url::parse(&href) {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(%href, error = %err, "host location unparseable, query update skipped");
                return;
            }
        };

        let mut query = if replace {
            QueryParams::new()
        } else {
            url.query().map(QueryParams::parse).unwrap_or_default()
        };
        for (key, value) in updates {
            let key = key.into();
            match value.map(Into::into).filter(|value: &String| !value.is_empty()) {
                Some(value) => query.set(key, value),
                None => {
                    query.remove(&key);
                }
            }
        }

        let search = query.to_query_string();
        url.set_query((!search.is_empty()).then_some(search.as_str()));
        if let Err(err) = self.host.replace_state(&empty_state(), url.as_str()) {
            tracing::warn!(url = %url, error = %err, "query update refused by host");
            return;
        }

        let parts = decompose(url.as_str(), self.host.origin().as_deref());
        tracing::debug!(url = %url, "query params updated");
        self.store.query().set(parts.query);
    }

    /// Current value of a query parameter, or `default` if absent or empty.
    pub fn query_param(&self, key: &str, default: &str) -> String {
        self.store
            .query()
            .with(|query| {
                query
                    .get(key)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| default.to_string())
    }

    /// Payload for the host's current pathname, without publishing.
    ///
    /// Falls back to the fallback payload; `None` without a host location.
    pub fn current_payload(&self) -> Option<P> {
        let href = self.host.href()?;
        let parts = decompose(&href, self.host.origin().as_deref());
        self.table.read().resolve_payload(&parts.pathname)
    }

    async fn resolve(&self, target: &str, kind: NavigationKind) -> NavigationOutcome<P> {
        let Some(origin) = self.host.origin() else {
            tracing::trace!(%target, "no host location, navigation skipped");
            return NavigationOutcome::Unmatched;
        };
        let id = NavigationId::new();
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        *self.phase.lock() = NavigationPhase::Resolving;

        let parts = decompose(target, Some(origin.as_str()));
        tracing::debug!(navigation_id = %id, %target, pathname = %parts.pathname, ?kind, "navigation started");

        let (matched, fallback) = {
            let table = self.table.read();
            let matched = table
                .find(&parts.pathname)
                .map(|(entry, params)| (entry.payload.clone(), entry.guard.clone(), params));
            (matched, table.fallback().cloned())
        };

        let resolved = match (matched, fallback) {
            (Some((payload, guard, params)), _) => {
                if let Some(guard) = guard {
                    let from = self.last_committed_path();
                    if !guard.check(&parts.pathname, &from).await {
                        tracing::debug!(navigation_id = %id, to = %parts.pathname, %from, "navigation cancelled by guard");
                        return self.finish(ticket, NavigationOutcome::Cancelled);
                    }
                }
                Some((payload, params, false))
            }
            (None, Some(fallback)) => Some((fallback, Params::new(), true)),
            (None, None) => None,
        };

        let _commit = self.commit_lock.lock();
        if self.latest.load(Ordering::SeqCst) != ticket {
            tracing::debug!(navigation_id = %id, to = %parts.pathname, "navigation superseded");
            return NavigationOutcome::Superseded;
        }
        if kind == NavigationKind::Push {
            if let Err(err) = self.host.push_state(&empty_state(), target) {
                tracing::warn!(navigation_id = %id, %target, error = %err, "history push refused by host");
                return self.finish(ticket, NavigationOutcome::Rejected);
            }
        }

        let outcome = match resolved {
            Some((payload, params, fallback)) => {
                self.commit(id, kind, parts, payload.clone(), params, fallback);
                if fallback {
                    NavigationOutcome::FallbackCommitted(payload)
                } else {
                    NavigationOutcome::Committed(payload)
                }
            }
            None => {
                self.store.location().set(self.current_location(&parts));
                tracing::debug!(navigation_id = %id, pathname = %parts.pathname, "no route matched");
                NavigationOutcome::Unmatched
            }
        };

        self.finish(ticket, outcome)
    }

    /// Publish a navigation whose history update already happened.
    fn commit(
        &self,
        id: NavigationId,
        kind: NavigationKind,
        parts: UrlParts,
        payload: P,
        params: Params,
        fallback: bool,
    ) {
        let location = self.current_location(&parts);
        let UrlParts {
            pathname,
            query,
            hash,
        } = parts;
        self.store.publish(Commit {
            location,
            route: RouteDescriptor {
                path: pathname.clone(),
                payload: Some(payload),
                params,
            },
            query,
            hash,
        });

        let from = std::mem::replace(&mut *self.last_path.lock(), pathname.clone());
        let record = NavigationRecord {
            id,
            from,
            to: pathname,
            kind,
            fallback,
            timestamp: Utc::now(),
        };
        tracing::debug!(navigation_id = %id, from = %record.from, to = %record.to, fallback, "navigation committed");
        self.log.lock().append(record, self.config.history_limit);
    }

    fn current_location(&self, parts: &UrlParts) -> LocationSnapshot {
        match self.host.href() {
            Some(href) => LocationSnapshot::from_href(&href),
            None => LocationSnapshot::from_parts(parts),
        }
    }

    fn finish(&self, ticket: u64, outcome: NavigationOutcome<P>) -> NavigationOutcome<P> {
        if self.latest.load(Ordering::SeqCst) == ticket {
            *self.phase.lock() = outcome.phase();
        }
        outcome
    }
}

impl<P, H> std::fmt::Debug for Router<P, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table.read().len())
            .field("phase", &*self.phase.lock())
            .field("last_path", &*self.last_path.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Guard;
    use crate::host::{HeadlessHost, MemoryHost, OperationKind};
    use std::sync::Arc;

    fn router() -> Router<&'static str, Arc<MemoryHost>> {
        let host = Arc::new(MemoryHost::new("http://localhost:3000/").unwrap());
        let router = Router::new(host);
        router.add_route("/", "home");
        router.add_route("/about", "about");
        router.add_route("/blog/:id", "blog");
        router
    }

    #[tokio::test]
    async fn navigate_commits_matching_route() {
        let router = router();

        let outcome = router.navigate("/about").await;

        assert_eq!(outcome, NavigationOutcome::Committed("about"));
        assert_eq!(router.phase(), NavigationPhase::Committed);
        assert_eq!(router.store().route().get().payload, Some("about"));
        assert_eq!(router.last_committed_path(), "/about");
        assert_eq!(router.host().operations().len(), 1);
    }

    #[tokio::test]
    async fn unmatched_without_fallback_leaves_route_untouched() {
        let router = router();

        let outcome = router.navigate("/nope").await;

        assert_eq!(outcome, NavigationOutcome::Unmatched);
        assert_eq!(router.phase(), NavigationPhase::Idle);
        assert_eq!(router.store().route().get(), RouteDescriptor::default());
        assert_eq!(router.store().location().get().pathname, "/nope");
        assert_eq!(router.last_committed_path(), "/");
        assert!(router.history().is_empty());
    }

    #[tokio::test]
    async fn guard_sees_previous_committed_path() {
        let router = router();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        router.add_route_with(
            "/secret",
            "secret",
            RouteOptions::new().guard(Guard::from_fn(move |to, from| {
                sink.lock().push((to.to_string(), from.to_string()));
                true
            })),
        );

        router.navigate("/about").await;
        router.navigate("/secret").await;

        assert_eq!(
            *seen.lock(),
            vec![("/secret".to_string(), "/about".to_string())]
        );
        assert_eq!(router.last_committed_path(), "/secret");
    }

    #[tokio::test]
    async fn pop_navigation_does_not_push() {
        let router = router();
        router.navigate("/about").await;
        router.navigate("/blog/1").await;
        assert!(router.host().back());

        let outcome = router.navigate_to_current_url().await;

        assert_eq!(outcome, NavigationOutcome::Committed("about"));
        assert_eq!(router.host().operations().len(), 2);
        assert_eq!(router.history().last().unwrap().kind, NavigationKind::Pop);
    }

    #[tokio::test]
    async fn goto_builds_query_and_hash() {
        let router = router();
        let query: QueryParams = [("tab", "x"), ("q", "a b")].into_iter().collect();

        router.goto("/blog/7", &query, "top").await;
        router.goto("/about", &QueryParams::new(), "").await;

        let urls: Vec<String> = router.host().operations().into_iter().map(|op| op.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://localhost:3000/blog/7?tab=x&q=a+b#top",
                "http://localhost:3000/about"
            ]
        );
    }

    #[tokio::test]
    async fn update_query_params_replaces_history_entry() {
        let router = router();
        router.navigate("/blog/1?page=1&q=old").await;

        router.update_query_params([("page", None), ("q", Some("x"))], false);

        let query = router.store().query().get();
        assert_eq!(query, QueryParams::from_iter([("q", "x")]));
        let last = router.host().operations().pop().unwrap();
        assert_eq!(last.kind, OperationKind::Replace);
        assert_eq!(last.url, "http://localhost:3000/blog/1?q=x");
    }

    #[tokio::test]
    async fn update_query_params_replace_mode_discards_existing() {
        let router = router();
        router.navigate("/blog/1?page=1&q=old").await;

        router.update_query_params([("sort", Some("asc")), ("empty", Some(""))], true);

        assert_eq!(
            router.store().query().get(),
            QueryParams::from_iter([("sort", "asc")])
        );
        assert_eq!(
            router.host().href().as_deref(),
            Some("http://localhost:3000/blog/1?sort=asc")
        );
    }

    #[tokio::test]
    async fn removing_last_query_param_drops_marker() {
        let router = router();
        router.navigate("/about?page=2").await;

        router.update_query_params([("page", None::<&str>)], false);

        assert_eq!(router.host().href().as_deref(), Some("http://localhost:3000/about"));
        assert!(router.store().query().get().is_empty());
    }

    #[tokio::test]
    async fn query_param_falls_back_to_default() {
        let router = router();
        router.navigate("/about?page=2&empty=").await;

        assert_eq!(router.query_param("page", "1"), "2");
        assert_eq!(router.query_param("empty", "none"), "none");
        assert_eq!(router.query_param("missing", "d"), "d");
    }

    #[tokio::test]
    async fn current_payload_reads_host_location() {
        let router = router();
        assert_eq!(router.current_payload(), Some("home"));

        router.host().push_state(&empty_state(), "/blog/3").unwrap();
        assert_eq!(router.current_payload(), Some("blog"));

        router.host().push_state(&empty_state(), "/missing").unwrap();
        assert_eq!(router.current_payload(), None);
        router.set_fallback("fallback");
        assert_eq!(router.current_payload(), Some("fallback"));
    }

    #[tokio::test]
    async fn headless_router_does_not_navigate() {
        let router: Router<&str, HeadlessHost> = Router::new(HeadlessHost);
        router.add_route("/", "home");
        router.set_fallback("fallback");

        assert_eq!(router.navigate("/about").await, NavigationOutcome::Unmatched);
        assert_eq!(router.navigate_to_current_url().await, NavigationOutcome::Unmatched);

        assert_eq!(router.phase(), NavigationPhase::Idle);
        assert_eq!(router.store().route().get(), RouteDescriptor::default());
        assert_eq!(router.store().location().get(), LocationSnapshot::default());
        assert!(router.history().is_empty());
        assert!(router.current_payload().is_none());

        router.update_query_params([("a", Some("b"))], false);
        assert!(router.store().query().get().is_empty());
    }

    #[tokio::test]
    async fn cross_origin_target_is_rejected_without_publishing() {
        let router = router();
        router.navigate("/blog/1").await;
        let before = router.store().route().get();

        let outcome = router.navigate("https://evil.example/about").await;

        assert_eq!(outcome, NavigationOutcome::Rejected);
        assert_eq!(router.phase(), NavigationPhase::Rejected);
        assert_eq!(router.store().route().get(), before);
        assert_eq!(router.store().location().get().pathname, "/blog/1");
        assert_eq!(router.host().href().as_deref(), Some("http://localhost:3000/blog/1"));
        assert_eq!(router.last_committed_path(), "/blog/1");
        assert_eq!(router.history().len(), 1);
    }

    #[tokio::test]
    async fn zero_history_limit_keeps_guard_previous_path() {
        let host = Arc::new(MemoryHost::new("http://localhost:3000/").unwrap());
        let config = RouterConfig {
            history_limit: Some(0),
            ..RouterConfig::default()
        };
        let router = Router::with_config(host, config);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        router.add_route("/about", "about");
        router.add_route_with(
            "/secret",
            "secret",
            RouteOptions::new().guard(Guard::from_fn(move |_to, from| {
                sink.lock().push(from.to_string());
                true
            })),
        );

        router.navigate("/about").await;
        router.navigate("/secret").await;

        assert_eq!(*seen.lock(), vec!["/about".to_string()]);
        assert_eq!(router.last_committed_path(), "/secret");
        assert_eq!(router.config().history_limit, Some(1));
        assert_eq!(router.history().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn parallel_navigations_leave_history_and_state_in_step() {
        let router = Arc::new(router());

        let tasks: Vec<_> = (0..32)
            .map(|n| {
                let router = Arc::clone(&router);
                tokio::spawn(async move { router.navigate(&format!("/blog/{n}")).await })
            })
            .collect();
        let mut committed = 0;
        for task in tasks {
            match task.await.unwrap() {
                NavigationOutcome::Committed("blog") => committed += 1,
                NavigationOutcome::Superseded => {}
                other => panic!("Unexpected outcome {:?}", other),
            }
        }
        assert!(committed >= 1);

        let href = router.host().href().unwrap();
        let route = router.store().route().get();
        assert_eq!(href, format!("http://localhost:3000{}", route.path));
        assert_eq!(router.store().location().get().pathname, route.path);
        assert_eq!(router.last_committed_path(), route.path);
        assert_eq!(router.host().operations().len(), committed);
        assert_eq!(router.history().len(), committed);
    }

    #[tokio::test]
    async fn history_limit_bounds_log() {
        let host = MemoryHost::new("http://localhost:3000/").unwrap();
        let config = RouterConfig {
            history_limit: Some(2),
            ..RouterConfig::default()
        };
        let router = Router::with_config(host, config);
        router.add_route("/:page", "page");

        for target in ["/a", "/b", "/c"] {
            router.navigate(target).await;
        }

        let history = router.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history.path(), vec!["/a", "/b", "/c"]);
    }
}
