//! # dishhub-platform
//!
//! Implementations of the backend capability traits for DishHub: the
//! hosted platform over HTTP (feature `appwrite`) and a process-local
//! platform used for development and tests, with injectable faults and
//! latency.

#[cfg(feature = "appwrite")]
pub mod appwrite;
pub mod manager;
pub mod memory;

pub use manager::Platform;
pub use memory::{FaultInjector, MemoryPlatform, PlatformOp};
