//! # dishhub-service
//!
//! Domain operations over dishes. [`DishService`] turns uploads, listings,
//! likes, comments and deletions into calls against the platform's
//! document and blob stores, and keeps the persisted shape of a dish from
//! leaking past it.
//!
//! Services follow constructor injection; platform handles are shared
//! through `Arc`.

pub mod dish;
pub mod operation;

pub use dish::{DishService, ImageUpload, ensure_owner, parse_tag_input};
pub use operation::{OperationPhase, OperationTracker};
