//! A single observable value with synchronous subscribers.

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle returned by [`Observable::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

/// A value that notifies its subscribers whenever it is replaced.
///
/// Every [`set`](Observable::set) is a full replace. Subscribers run
/// synchronously inside `set`, after the new value is stored and with no
/// lock held, so a subscriber may read any observable or subscribe again.
///
/// # Example
///
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use waypoint::store::Observable;
///
/// let hash = Observable::new(String::new());
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sink = Arc::clone(&seen);
/// let id = hash.subscribe(move |value: &String| sink.lock().unwrap().push(value.clone()));
///
/// hash.set("top".to_string());
/// assert!(hash.unsubscribe(id));
/// hash.set("bottom".to_string());
///
/// assert_eq!(*seen.lock().unwrap(), vec!["top".to_string()]);
/// assert_eq!(hash.get(), "bottom");
/// ```
pub struct Observable<T> {
    value: RwLock<T>,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber<T>)>>,
}

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: RwLock::new(initial),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Run `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read())
    }

    /// Replace the value and notify every subscriber with it.
    pub fn set(&self, value: T) {
        *self.value.write() = value.clone();
        let subscribers: Vec<Subscriber<T>> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect();
        for subscriber in subscribers {
            subscriber(&value);
        }
    }

    /// Register a callback invoked on every subsequent `set`.
    pub fn subscribe<F>(&self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.subscribers.lock().push((id, Arc::new(subscriber)));
        id
    }

    /// Remove a subscription. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.value.read())
            .field("subscribers", &self.subscribers.lock().len())
            .finish()
    }
}
