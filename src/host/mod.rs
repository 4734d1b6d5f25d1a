//! The browsing context the router runs in.
//!
//! The router never touches a browser directly. It reads the current
//! location and mutates session history through a [`Host`], so the same
//! engine runs against a real browser binding, the in-memory
//! [`MemoryHost`], or [`HeadlessHost`] where no location exists at all.

mod memory;

pub use memory::{HistoryEntry, HistoryOperation, MemoryHost, OperationKind};

use serde_json::Value;
use thiserror::Error;

/// Errors raised while setting up a host or updating its history.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Invalid host url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Host url '{0}' has no usable origin")]
    OpaqueOrigin(String),

    #[error("Cannot resolve '{url}' against the current location: {source}")]
    Unresolvable {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("History update to '{url}' leaves origin '{origin}'")]
    CrossOrigin { url: String, origin: String },
}

/// Location and session-history access.
///
/// `state` is the opaque object stored with each history entry; the
/// router always passes an empty JSON object.
pub trait Host: Send + Sync {
    /// Serialized origin such as `http://localhost:3000`, or `None` when
    /// there is no live location.
    fn origin(&self) -> Option<String>;

    /// Absolute URL of the current location.
    fn href(&self) -> Option<String>;

    /// Add a history entry for `url`, resolved against the current location.
    ///
    /// A refused update must leave the session untouched.
    fn push_state(&self, state: &Value, url: &str) -> Result<(), HostError>;

    /// Overwrite the current history entry with `url`.
    fn replace_state(&self, state: &Value, url: &str) -> Result<(), HostError>;
}

/// Host for environments without a browsing context.
///
/// Reports no location and ignores history mutations.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadlessHost;

impl Host for HeadlessHost {
    fn origin(&self) -> Option<String> {
        None
    }

    fn href(&self) -> Option<String> {
        None
    }

    fn push_state(&self, _state: &Value, url: &str) -> Result<(), HostError> {
        tracing::trace!(%url, "headless host ignored push");
        Ok(())
    }

    fn replace_state(&self, _state: &Value, url: &str) -> Result<(), HostError> {
        tracing::trace!(%url, "headless host ignored replace");
        Ok(())
    }
}

impl<H: Host + ?Sized> Host for std::sync::Arc<H> {
    fn origin(&self) -> Option<String> {
        (**self).origin()
    }

    fn href(&self) -> Option<String> {
        (**self).href()
    }

    fn push_state(&self, state: &Value, url: &str) -> Result<(), HostError> {
        (**self).push_state(state, url)
    }

    fn replace_state(&self, state: &Value, url: &str) -> Result<(), HostError> {
        (**self).replace_state(state, url)
    }
}

/// The opaque state object stored with every router-issued entry.
pub fn empty_state() -> Value {
    Value::Object(serde_json::Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_host_has_no_location() {
        let host = HeadlessHost;
        assert!(host.push_state(&empty_state(), "/about").is_ok());

        assert!(host.origin().is_none());
        assert!(host.href().is_none());
    }

    #[test]
    fn empty_state_is_an_empty_object() {
        assert_eq!(empty_state().to_string(), "{}");
    }
}
