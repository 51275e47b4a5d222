//! Upload limits and feed defaults.

use serde::{Deserialize, Serialize};

/// Constraints checked before an image is sent to blob storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum image size in bytes (default 5 MiB).
    #[serde(default = "default_max_size")]
    pub max_size_bytes: u64,
    /// Accepted MIME type prefix.
    #[serde(default = "default_mime_prefix")]
    pub accepted_mime_prefix: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: default_max_size(),
            accepted_mime_prefix: default_mime_prefix(),
        }
    }
}

/// Listing defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Page size when the caller does not pass one.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

fn default_max_size() -> u64 {
    5 * 1024 * 1024
}

fn default_mime_prefix() -> String {
    "image/".to_string()
}

fn default_limit() -> u32 {
    10
}
