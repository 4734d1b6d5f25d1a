//! Route registration and lookup.

mod table;

pub use table::{MatchResult, RouteEntry, RouteOptions, RouteTable};
