//! In-memory blob storage.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use dishhub_core::error::PlatformError;
use dishhub_core::result::PlatformResult;
use dishhub_core::traits::blobs::BlobStore;
use dishhub_core::types::id::FileId;
use dishhub_core::types::record::{FileRecord, FileUpload, PreviewOptions};

use super::faults::{FaultInjector, PlatformOp};

#[derive(Debug, Clone)]
struct StoredFile {
    record: FileRecord,
    data: Bytes,
}

/// Files held in process memory, keyed by bucket and file id.
#[derive(Debug)]
pub struct MemoryBlobStore {
    endpoint: String,
    project_id: String,
    files: DashMap<(String, FileId), StoredFile>,
    faults: Arc<FaultInjector>,
}

impl MemoryBlobStore {
    /// Create an empty store. Preview URLs are built against `endpoint`.
    pub fn new(endpoint: &str, project_id: &str, faults: Arc<FaultInjector>) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            files: DashMap::new(),
            faults,
        }
    }

    /// Whether a file exists.
    pub fn contains(&self, bucket_id: &str, file_id: &FileId) -> bool {
        self.files
            .contains_key(&(bucket_id.to_string(), file_id.clone()))
    }

    /// Stored content of a file.
    pub fn read(&self, bucket_id: &str, file_id: &FileId) -> Option<Bytes> {
        self.files
            .get(&(bucket_id.to_string(), file_id.clone()))
            .map(|file| file.data.clone())
    }

    /// Number of files in a bucket.
    pub fn file_count(&self, bucket_id: &str) -> usize {
        self.files
            .iter()
            .filter(|entry| entry.key().0 == bucket_id)
            .count()
    }

    /// Ids of the files in a bucket.
    pub fn file_ids(&self, bucket_id: &str) -> Vec<FileId> {
        self.files
            .iter()
            .filter(|entry| entry.key().0 == bucket_id)
            .map(|entry| entry.key().1.clone())
            .collect()
    }

    /// Remove a file without going through the fault injector.
    pub fn remove_silently(&self, bucket_id: &str, file_id: &FileId) {
        self.files
            .remove(&(bucket_id.to_string(), file_id.clone()));
    }
}

fn file_not_found() -> PlatformError {
    PlatformError::api(
        404,
        "storage_file_not_found",
        "The requested file could not be found.",
    )
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn create_file(&self, bucket_id: &str, upload: FileUpload) -> PlatformResult<FileRecord> {
        self.faults.enter(PlatformOp::CreateFile).await?;

        let key = (bucket_id.to_string(), upload.file_id.clone());
        if self.files.contains_key(&key) {
            return Err(PlatformError::api(
                409,
                "storage_file_already_exists",
                "A storage file with the requested ID already exists.",
            ));
        }

        let record = FileRecord {
            id: upload.file_id,
            bucket_id: bucket_id.to_string(),
            name: upload.file_name,
            mime_type: upload.mime_type,
            size_bytes: upload.data.len() as u64,
        };
        self.files.insert(
            key,
            StoredFile {
                record: record.clone(),
                data: upload.data,
            },
        );
        Ok(record)
    }

    async fn get_file(&self, bucket_id: &str, file_id: &FileId) -> PlatformResult<FileRecord> {
        self.faults.enter(PlatformOp::GetFile).await?;

        self.files
            .get(&(bucket_id.to_string(), file_id.clone()))
            .map(|file| file.record.clone())
            .ok_or_else(file_not_found)
    }

    async fn delete_file(&self, bucket_id: &str, file_id: &FileId) -> PlatformResult<()> {
        self.faults.enter(PlatformOp::DeleteFile).await?;

        self.files
            .remove(&(bucket_id.to_string(), file_id.clone()))
            .map(|_| ())
            .ok_or_else(file_not_found)
    }

    fn file_preview_url(
        &self,
        bucket_id: &str,
        file_id: &FileId,
        options: &PreviewOptions,
    ) -> PlatformResult<String> {
        Ok(format!(
            "{}/storage/buckets/{bucket_id}/files/{file_id}/preview?width={}&height={}&gravity={}&quality={}&project={}",
            self.endpoint,
            options.width,
            options.height,
            options.gravity,
            options.quality,
            self.project_id,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(id: &FileId) -> FileUpload {
        FileUpload {
            file_id: id.clone(),
            file_name: "pho.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            data: Bytes::from_static(b"\xff\xd8\xff"),
        }
    }

    #[tokio::test]
    async fn test_create_get_delete() {
        let store = MemoryBlobStore::new("memory://dishhub", "proj", Arc::new(FaultInjector::new()));
        let id = FileId::unique();

        let record = store.create_file("images", upload(&id)).await.expect("create");
        assert_eq!(record.size_bytes, 3);
        assert_eq!(store.get_file("images", &id).await.expect("get").name, "pho.jpg");

        store.delete_file("images", &id).await.expect("delete");
        let err = store.delete_file("images", &id).await.expect_err("gone");
        assert!(err.is_not_found());
        assert_eq!(store.file_count("images"), 0);
    }

    #[test]
    fn test_preview_url_carries_options() {
        let store = MemoryBlobStore::new("memory://dishhub/", "proj", Arc::new(FaultInjector::new()));
        let url = store
            .file_preview_url("images", &FileId::from_raw("f1"), &PreviewOptions::default())
            .expect("url");
        assert_eq!(
            url,
            "memory://dishhub/storage/buckets/images/files/f1/preview?width=2000&height=2000&gravity=center&quality=100&project=proj"
        );
    }
}
