//! Content repository: domain operations on dishes.
//!
//! Uploads and deletes span the blob store and the document store without
//! a transaction. A failed document write after a stored image leaves the
//! image orphaned; a failed image delete does not stop the dish delete.
//! Likes and comments are read-modify-write from the caller's snapshot,
//! so concurrent writers from the same snapshot lose updates.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, warn};

use dishhub_core::config::{AppConfig, PlatformConfig, UploadConfig};
use dishhub_core::error::{AppError, ErrorKind};
use dishhub_core::result::AppResult;
use dishhub_core::traits::blobs::BlobStore;
use dishhub_core::traits::documents::DocumentStore;
use dishhub_core::types::id::{CommentId, DishId, FileId, UserId};
use dishhub_core::types::query::{CREATED_AT, Query};
use dishhub_core::types::record::{FileUpload, PreviewOptions};
use dishhub_entity::dish::model::{USER_ID_ATTR, comments_patch, likes_patch};
use dishhub_entity::dish::{Comment, Dish, DishFields};
use dishhub_platform::Platform;

use super::upload::ImageUpload;

/// Domain operations over the dish collection.
#[derive(Debug, Clone)]
pub struct DishService {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    database_id: String,
    collection_id: String,
    bucket_id: String,
    preview: PreviewOptions,
    upload_rules: UploadConfig,
}

impl DishService {
    /// Build the service over a platform using application configuration.
    pub fn new(platform: &Platform, config: &AppConfig) -> Self {
        Self::from_parts(
            platform.documents(),
            platform.blobs(),
            &config.platform,
            &config.upload,
        )
    }

    pub fn from_parts(
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        platform: &PlatformConfig,
        upload_rules: &UploadConfig,
    ) -> Self {
        Self {
            documents,
            blobs,
            database_id: platform.database_id.clone(),
            collection_id: platform.collection_id.clone(),
            bucket_id: platform.bucket_id.clone(),
            preview: platform.preview.clone(),
            upload_rules: upload_rules.clone(),
        }
    }

    /// Upload an image and create the dish that points at it.
    ///
    /// The image is stored first under a fresh file id; the dish document
    /// is written second with zero likes and no comments.
    pub async fn upload_dish(
        &self,
        image: ImageUpload,
        owner: &UserId,
        caption: Option<&str>,
        tags: Vec<String>,
    ) -> AppResult<Dish> {
        if owner.as_str().trim().is_empty() {
            return Err(AppError::validation("You must be signed in to upload"));
        }
        let mime_type = image.validate(&self.upload_rules)?;

        let file_id = FileId::unique();
        let upload = FileUpload {
            file_id: file_id.clone(),
            file_name: image.file_name,
            mime_type,
            data: image.data,
        };
        self.blobs
            .create_file(&self.bucket_id, upload)
            .await
            .map_err(|e| AppError::from_platform(ErrorKind::Upload, "Failed to upload image", e))?;

        let image_url = self
            .blobs
            .file_preview_url(&self.bucket_id, &file_id, &self.preview)
            .map_err(|e| {
                warn!(file_id = %file_id, "Image stored without a dish");
                AppError::from_platform(ErrorKind::Upload, "Failed to derive image URL", e)
            })?;

        let dish = Dish::draft(
            owner.clone(),
            file_id.clone(),
            image_url,
            caption.unwrap_or_default().to_string(),
            tags,
        );
        let data = DishFields::try_from(&dish)
            .and_then(DishFields::into_map)
            .map_err(|e| stranded_image(&file_id, "Failed to prepare dish", e))?;

        let record = self
            .documents
            .create_document(&self.database_id, &self.collection_id, dish.id.as_str(), data)
            .await
            .map_err(|e| {
                warn!(file_id = %file_id, "Image stored without a dish");
                AppError::from_platform(ErrorKind::Upload, "Failed to save dish", e)
            })?;

        info!(dish_id = %record.id, user_id = %owner, file_id = %file_id, "Dish uploaded");
        Ok(Dish::from(record))
    }

    /// Newest dishes first, at most `limit`.
    pub async fn get_all_dishes(&self, limit: u32) -> AppResult<Vec<Dish>> {
        self.list(vec![Query::order_desc(CREATED_AT), Query::limit(limit)])
            .await
    }

    /// Newest dishes of one user first, at most `limit`.
    pub async fn get_user_dishes(&self, user_id: &UserId, limit: u32) -> AppResult<Vec<Dish>> {
        self.list(vec![
            Query::equal(USER_ID_ATTR, user_id.as_str()),
            Query::order_desc(CREATED_AT),
            Query::limit(limit),
        ])
        .await
    }

    async fn list(&self, queries: Vec<Query>) -> AppResult<Vec<Dish>> {
        let page = self
            .documents
            .list_documents(&self.database_id, &self.collection_id, &queries)
            .await
            .map_err(|e| AppError::from_platform(ErrorKind::Fetch, "Failed to load dishes", e))?;
        Ok(page.documents.into_iter().map(Dish::from).collect())
    }

    /// One dish; `NotFound` when the platform has no such document.
    pub async fn get_dish(&self, id: &DishId) -> AppResult<Dish> {
        self.documents
            .get_document(&self.database_id, &self.collection_id, id.as_str())
            .await
            .map(Dish::from)
            .map_err(|e| AppError::from_platform(ErrorKind::Fetch, "Failed to load dish", e))
    }

    /// Delete a dish and, best effort, its image.
    ///
    /// Succeeds once the document is gone, even if the image delete failed
    /// or the image was already absent.
    pub async fn delete_dish(&self, id: &DishId, image_id: Option<&FileId>) -> AppResult<()> {
        if let Some(file_id) = image_id {
            if let Err(e) = self.blobs.delete_file(&self.bucket_id, file_id).await {
                warn!(dish_id = %id, file_id = %file_id, error = %e, "Image delete failed, deleting dish anyway");
            }
        }

        self.documents
            .delete_document(&self.database_id, &self.collection_id, id.as_str())
            .await
            .map_err(|e| AppError::from_platform(ErrorKind::Update, "Failed to delete dish", e))?;

        info!(dish_id = %id, "Dish deleted");
        Ok(())
    }

    /// Add one like on top of the caller's snapshot of the counter.
    ///
    /// Refuses when the snapshot's counter could not be read, so a stored
    /// value is never replaced by a count built on the display fallback.
    pub async fn like_dish(&self, snapshot: &Dish) -> AppResult<Dish> {
        if snapshot.likes_unreadable {
            warn!(dish_id = %snapshot.id, "Refusing to like dish with unreadable counter");
            return Err(AppError::update(
                "Failed to like dish: stored like counter is unreadable",
            ));
        }
        self.write_likes(
            &snapshot.id,
            snapshot.likes.saturating_add(1),
            "Failed to like dish",
        )
        .await
    }

    /// Overwrite the like counter.
    pub async fn update_likes(&self, id: &DishId, likes: u64) -> AppResult<Dish> {
        self.write_likes(id, likes, "Failed to update likes").await
    }

    async fn write_likes(&self, id: &DishId, likes: u64, context: &str) -> AppResult<Dish> {
        let dish = self.patch(id, likes_patch(likes), context).await?;
        info!(dish_id = %id, likes, "Likes written");
        Ok(dish)
    }

    /// Append a comment to the caller's snapshot of the list and rewrite
    /// the whole list.
    pub async fn add_comment(
        &self,
        snapshot: &Dish,
        author: &UserId,
        author_name: &str,
        text: &str,
    ) -> AppResult<Dish> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation("Comment cannot be empty"));
        }
        let current = writable_comments(snapshot, "Failed to add comment")?;

        let mut comments = current.to_vec();
        comments.push(Comment::new(author.clone(), author_name, text));
        let patch = comments_patch(&comments)?;
        self.patch(&snapshot.id, patch, "Failed to add comment").await
    }

    /// Remove one of the requester's own comments from the caller's
    /// snapshot and rewrite the whole list.
    pub async fn remove_comment(
        &self,
        snapshot: &Dish,
        comment_id: &CommentId,
        requester: &UserId,
    ) -> AppResult<Dish> {
        let current = writable_comments(snapshot, "Failed to delete comment")?;
        let target = current
            .iter()
            .find(|c| &c.id == comment_id)
            .ok_or_else(|| AppError::not_found("Comment not found"))?;
        if &target.user_id != requester {
            return Err(AppError::authorization(
                "You can only delete your own comments",
            ));
        }

        let remaining: Vec<Comment> = current
            .iter()
            .filter(|c| &c.id != comment_id)
            .cloned()
            .collect();
        let patch = comments_patch(&remaining)?;
        self.patch(&snapshot.id, patch, "Failed to delete comment").await
    }

    async fn patch(
        &self,
        id: &DishId,
        data: Map<String, Value>,
        context: &str,
    ) -> AppResult<Dish> {
        self.documents
            .update_document(&self.database_id, &self.collection_id, id.as_str(), data)
            .await
            .map(Dish::from)
            .map_err(|e| AppError::from_platform(ErrorKind::Update, context, e))
    }
}

/// Upload failure after the image was stored; the image is left behind.
fn stranded_image(
    file_id: &FileId,
    context: &str,
    err: impl std::error::Error + Send + Sync + 'static,
) -> AppError {
    warn!(file_id = %file_id, error = %err, "Image stored without a dish");
    AppError::with_source(ErrorKind::Upload, format!("{context}: {err}"), err)
}

/// Comments of a snapshot that may be rewritten in full.
fn writable_comments<'a>(snapshot: &'a Dish, context: &str) -> AppResult<&'a [Comment]> {
    if snapshot.comments_unreadable {
        warn!(dish_id = %snapshot.id, "Refusing to rewrite unreadable comment list");
        return Err(AppError::update(format!(
            "{context}: stored comment list is unreadable"
        )));
    }
    Ok(&snapshot.comments)
}

/// Reject a mutation of someone else's dish.
pub fn ensure_owner(dish: &Dish, user_id: &UserId) -> AppResult<()> {
    if dish.is_owned_by(user_id) {
        Ok(())
    } else {
        Err(AppError::authorization("You can only modify your own dishes"))
    }
}
