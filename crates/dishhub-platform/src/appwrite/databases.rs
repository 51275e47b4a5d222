//! Document endpoints.

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::{Map, Value, json};

use dishhub_core::result::PlatformResult;
use dishhub_core::traits::documents::DocumentStore;
use dishhub_core::types::query::Query;
use dishhub_core::types::record::{DocumentList, DocumentRecord};

use super::client::AppwriteClient;

/// Document store of the hosted platform.
#[derive(Debug, Clone)]
pub struct AppwriteDatabases {
    client: AppwriteClient,
}

impl AppwriteDatabases {
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    fn documents_url(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: Option<&str>,
    ) -> PlatformResult<Url> {
        let mut path = format!("/databases/{database_id}/collections/{collection_id}/documents");
        if let Some(id) = document_id {
            path.push('/');
            path.push_str(id);
        }
        self.client.url(&path)
    }

    pub(crate) fn list_url(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> PlatformResult<Url> {
        let mut url = self.documents_url(database_id, collection_id, None)?;
        if !queries.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for query in queries {
                pairs.append_pair("queries[]", &query.to_json().to_string());
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl DocumentStore for AppwriteDatabases {
    async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> PlatformResult<DocumentList> {
        let url = self.list_url(database_id, collection_id, queries)?;
        self.client
            .send_json(self.client.request(Method::GET, url))
            .await
    }

    async fn get_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> PlatformResult<DocumentRecord> {
        let url = self.documents_url(database_id, collection_id, Some(document_id))?;
        self.client
            .send_json(self.client.request(Method::GET, url))
            .await
    }

    async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> PlatformResult<DocumentRecord> {
        let url = self.documents_url(database_id, collection_id, None)?;
        let body = json!({ "documentId": document_id, "data": data });
        self.client
            .send_json(self.client.request(Method::POST, url).json(&body))
            .await
    }

    async fn update_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> PlatformResult<DocumentRecord> {
        let url = self.documents_url(database_id, collection_id, Some(document_id))?;
        let body = json!({ "data": data });
        self.client
            .send_json(self.client.request(Method::PATCH, url).json(&body))
            .await
    }

    async fn delete_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> PlatformResult<()> {
        let url = self.documents_url(database_id, collection_id, Some(document_id))?;
        self.client
            .send_empty(self.client.request(Method::DELETE, url))
            .await
    }
}
