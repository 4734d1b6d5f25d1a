//! Waypoint: a client-side router core for single-page applications
//!
//! Waypoint maps URL paths to application payloads, runs asynchronous
//! guards before a navigation commits, keeps session history in step, and
//! publishes the current route through observable slots a UI layer can
//! subscribe to.
//!
//! It follows a "pure core, imperative shell" split: pattern matching, URL
//! decomposition, and the navigation log are pure functions and values,
//! while the engine owns every side effect (host history and store
//! publication).
//!
//! # Core Concepts
//!
//! - **Routes**: `/`-separated patterns with `:param`, `:param?`, and `*`
//! - **Guards**: async predicates that may cancel a navigation
//! - **Host**: the browsing context supplying location and history
//! - **Store**: observable location, route, params, query, and hash
//!
//! # Example
//!
//! ```rust
//! use waypoint::host::MemoryHost;
//! use waypoint::{routes, Guard, NavigationOutcome};
//!
//! let host = MemoryHost::new("http://localhost:3000/").unwrap();
//! let router = routes! {
//!     fallback: "not-found";
//!     "/" => "home",
//!     "/blog/:id" => "blog",
//! }
//! .guarded_route("/secret", "secret", Guard::deny())
//! .build(host)
//! .unwrap();
//!
//! futures::executor::block_on(async {
//!     let outcome = router.navigate("/blog/42?tab=x#y").await;
//!     assert_eq!(outcome, NavigationOutcome::Committed("blog"));
//!     assert_eq!(router.store().params().get()["id"], "42");
//!     assert_eq!(router.store().query().get().get("tab"), Some("x"));
//!
//!     assert_eq!(router.navigate("/secret").await, NavigationOutcome::Cancelled);
//!     assert_eq!(router.store().route().get().path, "/blog/42");
//! });
//! ```

pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod core;
pub mod driver;
pub mod engine;
pub mod host;
pub mod routing;
pub mod store;

// Re-export commonly used types
pub use builder::{BuildError, RouterBuilder};
pub use config::RouterConfig;
pub use core::{decompose, match_path, Guard, NavigationPhase, Params, QueryParams, UrlParts};
pub use engine::{NavigationOutcome, Router};
pub use host::{HeadlessHost, Host, MemoryHost};
pub use routing::RouteOptions;
pub use store::RouterStore;
