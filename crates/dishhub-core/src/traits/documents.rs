//! Document-store capability of the hosted platform.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::result::PlatformResult;
use crate::types::query::Query;
use crate::types::record::{DocumentList, DocumentRecord};

/// CRUD over structured records addressed by database, collection, and id.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// List documents matching the queries.
    async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> PlatformResult<DocumentList>;

    /// Fetch one document.
    async fn get_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> PlatformResult<DocumentRecord>;

    /// Create a document under a caller-generated id.
    async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> PlatformResult<DocumentRecord>;

    /// Overwrite the given attributes of a document; others are kept.
    async fn update_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> PlatformResult<DocumentRecord>;

    /// Delete a document.
    async fn delete_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> PlatformResult<()>;
}
