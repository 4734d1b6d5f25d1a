//! Builder API for declaring routers up front.
//!
//! [`Router`](crate::engine::Router) can be filled route by route at
//! runtime; the builder collects the table first so patterns can be
//! validated before any navigation happens.

pub mod error;
pub mod macros;
pub mod router;

pub use error::{BuildError, PatternReport};
pub use router::RouterBuilder;
