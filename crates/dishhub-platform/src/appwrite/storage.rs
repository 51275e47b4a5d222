//! Storage endpoints.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::multipart::{Form, Part};

use dishhub_core::error::PlatformError;
use dishhub_core::result::PlatformResult;
use dishhub_core::traits::blobs::BlobStore;
use dishhub_core::types::id::FileId;
use dishhub_core::types::record::{FileRecord, FileUpload, PreviewOptions};

use super::client::AppwriteClient;

/// Blob storage of the hosted platform.
#[derive(Debug, Clone)]
pub struct AppwriteStorage {
    client: AppwriteClient,
}

impl AppwriteStorage {
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BlobStore for AppwriteStorage {
    async fn create_file(&self, bucket_id: &str, upload: FileUpload) -> PlatformResult<FileRecord> {
        let url = self
            .client
            .url(&format!("/storage/buckets/{bucket_id}/files"))?;
        let part = Part::bytes(upload.data.to_vec())
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)
            .map_err(|e| PlatformError::InvalidRequest(format!("mime type: {e}")))?;
        let form = Form::new()
            .text("fileId", upload.file_id.into_inner())
            .part("file", part);

        self.client
            .send_json(self.client.request(Method::POST, url).multipart(form))
            .await
    }

    async fn get_file(&self, bucket_id: &str, file_id: &FileId) -> PlatformResult<FileRecord> {
        let url = self
            .client
            .url(&format!("/storage/buckets/{bucket_id}/files/{file_id}"))?;
        self.client
            .send_json(self.client.request(Method::GET, url))
            .await
    }

    async fn delete_file(&self, bucket_id: &str, file_id: &FileId) -> PlatformResult<()> {
        let url = self
            .client
            .url(&format!("/storage/buckets/{bucket_id}/files/{file_id}"))?;
        self.client
            .send_empty(self.client.request(Method::DELETE, url))
            .await
    }

    fn file_preview_url(
        &self,
        bucket_id: &str,
        file_id: &FileId,
        options: &PreviewOptions,
    ) -> PlatformResult<String> {
        let mut url = self
            .client
            .url(&format!("/storage/buckets/{bucket_id}/files/{file_id}/preview"))?;
        url.query_pairs_mut()
            .append_pair("width", &options.width.to_string())
            .append_pair("height", &options.height.to_string())
            .append_pair("gravity", &options.gravity)
            .append_pair("quality", &options.quality.to_string())
            .append_pair("project", self.client.project_id());
        Ok(url.to_string())
    }
}
