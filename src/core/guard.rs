//! Guard predicates for controlling navigation.
//!
//! A guard is consulted before a navigation commits. It receives the
//! target pathname and the pathname of the last committed navigation, and
//! may suspend before answering. Answering `false` cancels the navigation.

use futures::future::{self, BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type GuardFn = dyn Fn(&str, &str) -> BoxFuture<'static, bool> + Send + Sync;

/// Async predicate deciding whether a navigation may commit.
///
/// Guards are cheap to clone; clones share the same predicate.
///
/// # Example
///
/// ```rust
/// use waypoint::core::Guard;
///
/// let only_from_login = Guard::from_fn(|_to, from| from == "/login");
///
/// futures::executor::block_on(async {
///     assert!(only_from_login.check("/secret", "/login").await);
///     assert!(!only_from_login.check("/secret", "/").await);
/// });
/// ```
#[derive(Clone)]
pub struct Guard {
    predicate: Arc<GuardFn>,
}

impl Guard {
    /// Create a guard from an async predicate.
    ///
    /// The predicate receives owned copies of the target and previous
    /// paths so the returned future can outlive the call.
    ///
    /// # Example
    ///
    /// ```rust
    /// use waypoint::core::Guard;
    ///
    /// let guard = Guard::new(|to: String, _from: String| async move {
    ///     !to.starts_with("/admin")
    /// });
    ///
    /// futures::executor::block_on(async {
    ///     assert!(guard.check("/about", "/").await);
    ///     assert!(!guard.check("/admin/users", "/").await);
    /// });
    /// ```
    pub fn new<F, Fut>(predicate: F) -> Self
    where
        F: Fn(String, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Guard {
            predicate: Arc::new(move |to: &str, from: &str| {
                predicate(to.to_string(), from.to_string()).boxed()
            }),
        }
    }

    /// Create a guard that answers immediately.
    pub fn from_fn<F>(predicate: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(move |to: &str, from: &str| {
                future::ready(predicate(to, from)).boxed()
            }),
        }
    }

    /// A guard that always allows.
    pub fn allow() -> Self {
        Guard::from_fn(|_, _| true)
    }

    /// A guard that always denies.
    pub fn deny() -> Self {
        Guard::from_fn(|_, _| false)
    }

    /// Ask the guard whether navigating from `from` to `to` may proceed.
    pub fn check(&self, to: &str, from: &str) -> BoxFuture<'static, bool> {
        (self.predicate)(to, from)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
