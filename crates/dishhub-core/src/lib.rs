//! # dishhub-core
//!
//! Core crate for DishHub. Contains the configuration schema, typed
//! platform identifiers, query primitives, the platform record shapes,
//! the backend capability traits, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DishHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind, PlatformError};
pub use result::{AppResult, PlatformResult};
