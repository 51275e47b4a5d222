//! # dishhub-web
//!
//! User-facing routes of the DishHub client and the guard that keeps the
//! profile and upload views behind a signed-in session.

pub mod guard;
pub mod router;

pub use guard::{GuardDecision, GuardedRouter, RouteGuard};
pub use router::{Resolution, Route, RouteTable};
