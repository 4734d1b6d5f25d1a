//! Reactive state published to the UI layer.
//!
//! The store owns one [`Observable`] per slot. It has no lifecycle of its
//! own: it lives exactly as long as the router that owns it.

mod observable;
mod slots;

pub use observable::{Observable, SubscriptionId};
pub use slots::{Commit, LocationSnapshot, RouteDescriptor, RouterStore};
