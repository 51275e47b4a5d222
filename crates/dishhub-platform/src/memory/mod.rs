//! Process-local platform used for development and tests.
//!
//! All three capabilities share one [`FaultInjector`], so a test can make
//! any individual call fail or stall.

pub mod account;
pub mod databases;
pub mod faults;
pub mod storage;

use std::sync::Arc;

pub use account::MemoryAccountService;
pub use databases::MemoryDocumentStore;
pub use faults::{FaultInjector, PlatformOp};
pub use storage::MemoryBlobStore;

/// Handles to the in-memory capability implementations.
#[derive(Debug, Clone)]
pub struct MemoryPlatform {
    pub faults: Arc<FaultInjector>,
    pub account: Arc<MemoryAccountService>,
    pub documents: Arc<MemoryDocumentStore>,
    pub blobs: Arc<MemoryBlobStore>,
}

impl MemoryPlatform {
    /// Create an empty platform. `endpoint` only shapes preview URLs.
    pub fn new(endpoint: &str, project_id: &str) -> Self {
        let faults = Arc::new(FaultInjector::new());
        Self {
            account: Arc::new(MemoryAccountService::new(faults.clone())),
            documents: Arc::new(MemoryDocumentStore::new(faults.clone())),
            blobs: Arc::new(MemoryBlobStore::new(endpoint, project_id, faults.clone())),
            faults,
        }
    }
}
