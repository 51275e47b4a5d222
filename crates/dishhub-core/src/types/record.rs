//! Record shapes returned by the hosted platform.
//!
//! These mirror what the platform stores and are deliberately loose:
//! document payloads stay as a JSON map until an entity decodes them.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::{FileId, SessionId, UserId};

/// A stored document: platform metadata plus the untyped payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Platform-assigned document id.
    #[serde(rename = "$id")]
    pub id: String,
    /// Creation time.
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
    /// Last update time.
    #[serde(rename = "$updatedAt")]
    pub updated_at: DateTime<Utc>,
    /// Everything else the document carries.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

/// One page of a document listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentList {
    /// Total number of documents matching the filters.
    pub total: u64,
    /// Documents on this page.
    pub documents: Vec<DocumentRecord>,
}

/// An account as reported by the platform's account service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account id.
    #[serde(rename = "$id")]
    pub id: UserId,
    /// Display name; may be empty.
    #[serde(default)]
    pub name: String,
    /// Email address.
    pub email: String,
    /// Account creation time.
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A session credential issued by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session id.
    #[serde(rename = "$id")]
    pub id: SessionId,
    /// Owner of the session.
    #[serde(rename = "userId")]
    pub user_id: UserId,
    /// Expiry time.
    pub expire: DateTime<Utc>,
}

/// Metadata of a file in blob storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// File id.
    #[serde(rename = "$id")]
    pub id: FileId,
    /// Bucket holding the file.
    #[serde(rename = "bucketId")]
    pub bucket_id: String,
    /// Original file name.
    pub name: String,
    /// MIME type.
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
    /// Size in bytes.
    #[serde(rename = "sizeOriginal", default)]
    pub size_bytes: u64,
}

/// A file to be written to blob storage.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Identifier to store the file under.
    pub file_id: FileId,
    /// File name.
    pub file_name: String,
    /// MIME type.
    pub mime_type: String,
    /// File content.
    pub data: Bytes,
}

/// Parameters of a derived preview image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewOptions {
    /// Target width in pixels.
    #[serde(default = "default_preview_size")]
    pub width: u32,
    /// Target height in pixels.
    #[serde(default = "default_preview_size")]
    pub height: u32,
    /// Crop gravity.
    #[serde(default = "default_gravity")]
    pub gravity: String,
    /// Output quality, 0-100.
    #[serde(default = "default_quality")]
    pub quality: u8,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            width: default_preview_size(),
            height: default_preview_size(),
            gravity: default_gravity(),
            quality: default_quality(),
        }
    }
}

fn default_preview_size() -> u32 {
    2000
}

fn default_gravity() -> String {
    "center".to_string()
}

fn default_quality() -> u8 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_record_keeps_payload() {
        let raw = serde_json::json!({
            "$id": "d1",
            "$createdAt": "2024-03-01T10:00:00.000+00:00",
            "$updatedAt": "2024-03-01T10:00:00.000+00:00",
            "$collectionId": "dishes",
            "caption": "Ramen",
            "likes": "3"
        });
        let doc: DocumentRecord = serde_json::from_value(raw).expect("decode");
        assert_eq!(doc.id, "d1");
        assert_eq!(doc.data.get("caption"), Some(&Value::String("Ramen".into())));
        assert_eq!(doc.data.get("likes"), Some(&Value::String("3".into())));
    }
}
