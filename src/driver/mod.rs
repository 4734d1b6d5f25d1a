//! Adapter from host events to router calls.
//!
//! A browser binding forwards two kinds of events: history traversal
//! (back/forward) and clicks on in-page links. The driver decides which of
//! them the router handles, so a binding only has to translate native
//! events into [`HostEvent`] and honour [`EventDisposition`].

use crate::engine::{NavigationOutcome, Router};
use crate::host::Host;
use url::Url;

/// Events a browsing context reports to the router.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// The location changed through history traversal.
    PopState,
    /// An anchor was activated.
    LinkClick {
        /// Absolute, resolved URL of the link.
        href: String,
        /// The `href` attribute exactly as written, if present.
        attribute: Option<String>,
    },
}

/// What the binding should do with the native event.
#[derive(Clone, Debug, PartialEq)]
pub enum EventDisposition<P> {
    /// Suppress the default action; the router took over. Carries the
    /// navigation outcome when a navigation was started.
    Intercepted(Option<NavigationOutcome<P>>),
    /// Let the host perform its default action.
    Ignored,
}

/// Routes host events into a [`Router`].
///
/// # Example
///
/// ```rust
/// use waypoint::driver::{Driver, EventDisposition, HostEvent};
/// use waypoint::engine::{NavigationOutcome, Router};
/// use waypoint::host::MemoryHost;
///
/// let router = Router::new(MemoryHost::new("http://localhost:3000/").unwrap());
/// router.add_route("/about", "about");
/// let driver = Driver::new(&router);
///
/// futures::executor::block_on(async {
///     let click = HostEvent::LinkClick {
///         href: "http://localhost:3000/about".to_string(),
///         attribute: Some("/about".to_string()),
///     };
///     assert_eq!(
///         driver.dispatch(click).await,
///         EventDisposition::Intercepted(Some(NavigationOutcome::Committed("about")))
///     );
///
///     let external = HostEvent::LinkClick {
///         href: "https://example.com/".to_string(),
///         attribute: Some("https://example.com/".to_string()),
///     };
///     assert_eq!(driver.dispatch(external).await, EventDisposition::Ignored);
/// });
/// ```
#[derive(Debug)]
pub struct Driver<'r, P, H> {
    router: &'r Router<P, H>,
}

impl<'r, P, H> Driver<'r, P, H>
where
    P: Clone + Send + Sync + 'static,
    H: Host,
{
    pub fn new(router: &'r Router<P, H>) -> Self {
        Self { router }
    }

    pub async fn dispatch(&self, event: HostEvent) -> EventDisposition<P> {
        match event {
            HostEvent::PopState => {
                EventDisposition::Intercepted(Some(self.router.navigate_to_current_url().await))
            }
            HostEvent::LinkClick { href, attribute } => {
                if !self.is_same_origin(&href) {
                    tracing::trace!(%href, "external link left to host");
                    return EventDisposition::Ignored;
                }
                match attribute.filter(|path| !path.is_empty()) {
                    Some(path) => {
                        EventDisposition::Intercepted(Some(self.router.navigate(&path).await))
                    }
                    None => EventDisposition::Intercepted(None),
                }
            }
        }
    }

    fn is_same_origin(&self, href: &str) -> bool {
        let Some(origin) = self.router.host().origin() else {
            return false;
        };
        Url::parse(href).is_ok_and(|url| url.origin().ascii_serialization() == origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HeadlessHost, MemoryHost};
    use std::sync::Arc;

    fn click(href: &str, attribute: Option<&str>) -> HostEvent {
        HostEvent::LinkClick {
            href: href.to_string(),
            attribute: attribute.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn same_origin_link_navigates_to_attribute() {
        let router = Router::new(Arc::new(MemoryHost::new("http://localhost:3000/").unwrap()));
        router.add_route("/blog/:id", "blog");
        let driver = Driver::new(&router);

        let disposition = driver
            .dispatch(click("http://localhost:3000/blog/9", Some("/blog/9")))
            .await;

        assert_eq!(
            disposition,
            EventDisposition::Intercepted(Some(NavigationOutcome::Committed("blog")))
        );
        assert_eq!(router.host().operations().len(), 1);
    }

    #[tokio::test]
    async fn link_without_attribute_is_intercepted_without_navigation() {
        let router: Router<&str, _> =
            Router::new(Arc::new(MemoryHost::new("http://localhost:3000/").unwrap()));
        let driver = Driver::new(&router);

        let disposition = driver.dispatch(click("http://localhost:3000/x", None)).await;

        assert_eq!(disposition, EventDisposition::Intercepted(None));
        assert!(router.host().operations().is_empty());
    }

    #[tokio::test]
    async fn pop_state_resyncs_without_pushing() {
        let router = Router::new(Arc::new(MemoryHost::new("http://localhost:3000/").unwrap()));
        router.add_route("/", "home");
        router.add_route("/about", "about");
        let driver = Driver::new(&router);

        router.navigate("/about").await;
        router.host().back();
        let disposition = driver.dispatch(HostEvent::PopState).await;

        assert_eq!(
            disposition,
            EventDisposition::Intercepted(Some(NavigationOutcome::Committed("home")))
        );
        assert_eq!(router.host().operations().len(), 1);
        assert_eq!(router.store().route().get().path, "/");
    }

    #[tokio::test]
    async fn lookalike_origins_are_left_to_host() {
        let router = Router::new(Arc::new(MemoryHost::new("http://localhost:3000/").unwrap()));
        router.add_route("/x", "x");
        let driver = Driver::new(&router);

        for href in ["http://localhost:3000.evil.com/x", "http://localhost:30001/x", "not a url"] {
            assert_eq!(driver.dispatch(click(href, Some("/x"))).await, EventDisposition::Ignored);
        }
        assert!(router.host().operations().is_empty());
    }

    #[tokio::test]
    async fn headless_host_never_intercepts_links() {
        let router: Router<&str, HeadlessHost> = Router::new(HeadlessHost);
        let driver = Driver::new(&router);

        let disposition = driver.dispatch(click("http://localhost/x", Some("/x"))).await;

        assert_eq!(disposition, EventDisposition::Ignored);
    }
}
