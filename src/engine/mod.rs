//! Navigation engine: the imperative shell around the pure core.
//!
//! A navigation moves through these phases:
//!
//! 1. decompose the target URL
//! 2. look up the first matching route
//! 3. await the route's guard, if any (the only suspension point)
//! 4. push history and publish every store slot together, or stop
//!
//! Nothing is mutated before the guard has answered.

mod outcome;
mod router;

pub use outcome::NavigationOutcome;
pub use router::Router;
