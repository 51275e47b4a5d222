//! In-memory document store.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::{Map, Value};

use dishhub_core::error::PlatformError;
use dishhub_core::result::PlatformResult;
use dishhub_core::traits::documents::DocumentStore;
use dishhub_core::types::query::{CREATED_AT, Query, SortDirection};
use dishhub_core::types::record::{DocumentList, DocumentRecord};

use super::faults::{FaultInjector, PlatformOp};

/// Page size applied when a list call carries no limit.
const DEFAULT_LIST_LIMIT: usize = 25;

#[derive(Debug, Clone)]
struct StoredDocument {
    seq: u64,
    record: DocumentRecord,
}

/// Documents held in process memory, keyed by `{database}/{collection}`.
#[derive(Debug)]
pub struct MemoryDocumentStore {
    collections: DashMap<String, HashMap<String, StoredDocument>>,
    next_seq: AtomicU64,
    faults: Arc<FaultInjector>,
}

impl MemoryDocumentStore {
    /// Create an empty store sharing the given fault injector.
    pub fn new(faults: Arc<FaultInjector>) -> Self {
        Self {
            collections: DashMap::new(),
            next_seq: AtomicU64::new(0),
            faults,
        }
    }

    /// Number of documents in a collection.
    pub fn document_count(&self, database_id: &str, collection_id: &str) -> usize {
        self.collections
            .get(&collection_key(database_id, collection_id))
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    /// Overwrite one raw attribute of a stored document, bypassing the
    /// store's own bookkeeping. Returns `false` when the document is absent.
    pub fn put_raw_attribute(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        attribute: &str,
        value: Value,
    ) -> bool {
        let key = collection_key(database_id, collection_id);
        let Some(mut docs) = self.collections.get_mut(&key) else {
            return false;
        };
        match docs.get_mut(document_id) {
            Some(doc) => {
                doc.record.data.insert(attribute.to_string(), value);
                true
            }
            None => false,
        }
    }
}

fn collection_key(database_id: &str, collection_id: &str) -> String {
    format!("{database_id}/{collection_id}")
}

fn document_not_found() -> PlatformError {
    PlatformError::api(
        404,
        "document_not_found",
        "Document with the requested ID could not be found.",
    )
}

fn attribute_value(record: &DocumentRecord, attribute: &str) -> Option<Value> {
    match attribute {
        "$id" => Some(Value::String(record.id.clone())),
        CREATED_AT => Some(Value::String(record.created_at.to_rfc3339())),
        "$updatedAt" => Some(Value::String(record.updated_at.to_rfc3339())),
        other => record.data.get(other).cloned(),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn compare_documents(a: &StoredDocument, b: &StoredDocument, attribute: &str) -> Ordering {
    let primary = if attribute == CREATED_AT {
        a.record.created_at.cmp(&b.record.created_at)
    } else {
        compare_values(
            attribute_value(&a.record, attribute).as_ref(),
            attribute_value(&b.record, attribute).as_ref(),
        )
    };
    primary.then(a.seq.cmp(&b.seq))
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> PlatformResult<DocumentList> {
        self.faults.enter(PlatformOp::ListDocuments).await?;

        let mut docs: Vec<StoredDocument> = self
            .collections
            .get(&collection_key(database_id, collection_id))
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default();

        let mut limit = DEFAULT_LIST_LIMIT;
        let mut order: Option<(&str, SortDirection)> = None;
        for query in queries {
            match query {
                Query::Equal { attribute, values } => docs.retain(|doc| {
                    attribute_value(&doc.record, attribute).is_some_and(|v| values.contains(&v))
                }),
                Query::Order {
                    attribute,
                    direction,
                } => {
                    if order.is_none() {
                        order = Some((attribute.as_str(), *direction));
                    }
                }
                Query::Limit(n) => limit = *n as usize,
            }
        }

        let (attribute, direction) = order.unwrap_or(("$id", SortDirection::Asc));
        docs.sort_by(|a, b| {
            let ord = compare_documents(a, b, attribute);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let total = docs.len() as u64;
        let documents = docs
            .into_iter()
            .take(limit)
            .map(|doc| doc.record)
            .collect();
        Ok(DocumentList { total, documents })
    }

    async fn get_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> PlatformResult<DocumentRecord> {
        self.faults.enter(PlatformOp::GetDocument).await?;

        self.collections
            .get(&collection_key(database_id, collection_id))
            .and_then(|docs| docs.get(document_id).map(|doc| doc.record.clone()))
            .ok_or_else(document_not_found)
    }

    async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> PlatformResult<DocumentRecord> {
        self.faults.enter(PlatformOp::CreateDocument).await?;

        let mut docs = self
            .collections
            .entry(collection_key(database_id, collection_id))
            .or_default();
        if docs.contains_key(document_id) {
            return Err(PlatformError::api(
                409,
                "document_already_exists",
                "Document with the requested ID already exists.",
            ));
        }

        let now = Utc::now();
        let record = DocumentRecord {
            id: document_id.to_string(),
            created_at: now,
            updated_at: now,
            data,
        };
        let seq = self.next_seq.fetch_add(1, AtomicOrdering::SeqCst);
        docs.insert(
            document_id.to_string(),
            StoredDocument {
                seq,
                record: record.clone(),
            },
        );
        Ok(record)
    }

    async fn update_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Map<String, Value>,
    ) -> PlatformResult<DocumentRecord> {
        self.faults.enter(PlatformOp::UpdateDocument).await?;

        let mut docs = self
            .collections
            .get_mut(&collection_key(database_id, collection_id))
            .ok_or_else(document_not_found)?;
        let doc = docs.get_mut(document_id).ok_or_else(document_not_found)?;

        doc.record.data.extend(data);
        doc.record.updated_at = Utc::now();
        Ok(doc.record.clone())
    }

    async fn delete_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> PlatformResult<()> {
        self.faults.enter(PlatformOp::DeleteDocument).await?;

        self.collections
            .get_mut(&collection_key(database_id, collection_id))
            .and_then(|mut docs| docs.remove(document_id))
            .map(|_| ())
            .ok_or_else(document_not_found)
    }
}
