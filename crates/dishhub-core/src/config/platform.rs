//! Hosted platform connection settings.

use serde::{Deserialize, Serialize};

use crate::types::record::PreviewOptions;

/// Which backend implementation serves the capability traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlatformProvider {
    /// The hosted platform over HTTP.
    #[default]
    Appwrite,
    /// A process-local platform for development and tests.
    Memory,
}

/// Connection and addressing settings of the hosted platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Backend implementation to use.
    #[serde(default)]
    pub provider: PlatformProvider,
    /// Platform API endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Project identifier.
    #[serde(default)]
    pub project_id: String,
    /// Database holding the dish collection.
    #[serde(default)]
    pub database_id: String,
    /// Collection storing dish documents.
    #[serde(default)]
    pub collection_id: String,
    /// Bucket storing dish images.
    #[serde(default)]
    pub bucket_id: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    /// Preview derived for every uploaded image.
    #[serde(default)]
    pub preview: PreviewOptions,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            provider: PlatformProvider::default(),
            endpoint: default_endpoint(),
            project_id: String::new(),
            database_id: String::new(),
            collection_id: String::new(),
            bucket_id: String::new(),
            request_timeout_seconds: default_timeout(),
            preview: PreviewOptions::default(),
        }
    }
}

fn default_endpoint() -> String {
    "https://cloud.appwrite.io/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}
