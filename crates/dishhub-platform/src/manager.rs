//! Platform facade: the three capability handles behind one value.

use std::sync::Arc;

use tracing::info;

use dishhub_core::config::{PlatformConfig, PlatformProvider};
use dishhub_core::error::{AppError, PlatformError};
use dishhub_core::result::AppResult;
use dishhub_core::traits::account::AccountService;
use dishhub_core::traits::blobs::BlobStore;
use dishhub_core::traits::documents::DocumentStore;

use crate::memory::MemoryPlatform;

/// Account, document and blob capabilities of one backend project.
#[derive(Debug, Clone)]
pub struct Platform {
    account: Arc<dyn AccountService>,
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    memory: Option<MemoryPlatform>,
}

impl Platform {
    /// Create the platform selected by configuration.
    pub fn new(config: &PlatformConfig) -> AppResult<Self> {
        match config.provider {
            PlatformProvider::Appwrite => Self::hosted(config),
            PlatformProvider::Memory => {
                info!("Initializing in-memory platform");
                Ok(Self::in_memory(MemoryPlatform::new(
                    &config.endpoint,
                    &config.project_id,
                )))
            }
        }
    }

    #[cfg(feature = "appwrite")]
    fn hosted(config: &PlatformConfig) -> AppResult<Self> {
        use crate::appwrite::{AppwriteAccount, AppwriteClient, AppwriteDatabases, AppwriteStorage};

        info!(endpoint = %config.endpoint, project = %config.project_id, "Initializing hosted platform");
        let client = AppwriteClient::new(config)?;
        Ok(Self::from_parts(
            Arc::new(AppwriteAccount::new(client.clone())),
            Arc::new(AppwriteDatabases::new(client.clone())),
            Arc::new(AppwriteStorage::new(client)),
        ))
    }

    #[cfg(not(feature = "appwrite"))]
    fn hosted(_config: &PlatformConfig) -> AppResult<Self> {
        Err(AppError::configuration(
            "Hosted platform support is not compiled in. Supported: memory",
        ))
    }

    /// Wrap an in-memory platform, keeping its handles reachable through
    /// [`Platform::memory`].
    pub fn in_memory(memory: MemoryPlatform) -> Self {
        Self {
            account: memory.account.clone(),
            documents: memory.documents.clone(),
            blobs: memory.blobs.clone(),
            memory: Some(memory),
        }
    }

    /// Assemble a platform from individual capability implementations.
    pub fn from_parts(
        account: Arc<dyn AccountService>,
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            account,
            documents,
            blobs,
            memory: None,
        }
    }

    pub fn account(&self) -> Arc<dyn AccountService> {
        self.account.clone()
    }

    pub fn documents(&self) -> Arc<dyn DocumentStore> {
        self.documents.clone()
    }

    pub fn blobs(&self) -> Arc<dyn BlobStore> {
        self.blobs.clone()
    }

    /// In-memory handles, when this platform is process-local.
    pub fn memory(&self) -> Option<&MemoryPlatform> {
        self.memory.as_ref()
    }

    /// Whether the platform answers at all.
    ///
    /// An authentication refusal still proves the platform is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        match self.account.current_account().await {
            Ok(_) | Err(PlatformError::Api { .. }) => Ok(true),
            Err(PlatformError::Network(e)) => {
                tracing::warn!(error = %e, "Platform unreachable");
                Ok(false)
            }
            Err(e @ (PlatformError::InvalidRequest(_) | PlatformError::InvalidResponse(_))) => Err(
                AppError::with_source(dishhub_core::ErrorKind::Internal, "Health check failed", e),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::PlatformOp;

    fn memory_config() -> PlatformConfig {
        PlatformConfig {
            provider: PlatformProvider::Memory,
            project_id: "proj".to_string(),
            ..PlatformConfig::default()
        }
    }

    #[tokio::test]
    async fn test_memory_provider_is_healthy_when_anonymous() {
        let platform = Platform::new(&memory_config()).expect("platform");
        assert!(platform.memory().is_some());
        assert!(platform.health_check().await.expect("health"));
    }

    #[tokio::test]
    async fn test_network_failure_is_unhealthy() {
        let platform = Platform::new(&memory_config()).expect("platform");
        let memory = platform.memory().expect("memory");
        memory
            .faults
            .fail_next(PlatformOp::GetAccount, PlatformError::Network("refused".into()));
        assert!(!platform.health_check().await.expect("health"));
    }

    #[cfg(feature = "appwrite")]
    #[test]
    fn test_hosted_provider_has_no_memory_handles() {
        let platform = Platform::new(&PlatformConfig {
            project_id: "proj".to_string(),
            ..PlatformConfig::default()
        })
        .expect("platform");
        assert!(platform.memory().is_none());
    }
}
