//! Blob-storage capability of the hosted platform.

use async_trait::async_trait;

use crate::result::PlatformResult;
use crate::types::id::FileId;
use crate::types::record::{FileRecord, FileUpload, PreviewOptions};

/// File upload, deletion, and preview URL derivation.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Write a file into a bucket.
    async fn create_file(&self, bucket_id: &str, upload: FileUpload) -> PlatformResult<FileRecord>;

    /// Fetch file metadata.
    async fn get_file(&self, bucket_id: &str, file_id: &FileId) -> PlatformResult<FileRecord>;

    /// Delete a file.
    async fn delete_file(&self, bucket_id: &str, file_id: &FileId) -> PlatformResult<()>;

    /// Derive the URL of a resized preview. Computed locally; the preview
    /// itself is rendered by the platform on first request.
    fn file_preview_url(
        &self,
        bucket_id: &str,
        file_id: &FileId,
        options: &PreviewOptions,
    ) -> PlatformResult<String>;
}
