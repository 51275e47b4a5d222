//! Dish entity: persisted shape, domain shape, and the mapping between them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use dishhub_core::types::id::{DishId, FileId, UserId};
use dishhub_core::types::record::DocumentRecord;

use super::comment::{Comment, EMPTY_COMMENTS, decode_comments, encode_comments};
use super::likes::{ZERO_LIKES, format_likes, likes_from_value, parse_likes};
use super::tags::{decode_tags, encode_tags};

/// Attribute holding the owning user id.
pub const USER_ID_ATTR: &str = "userId";
/// Attribute holding the like counter.
pub const LIKES_ATTR: &str = "likes";
/// Attribute holding the encoded comment list.
pub const COMMENTS_ATTR: &str = "comments";

/// Attributes of a dish document exactly as the document store keeps them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishFields {
    /// Owning user id.
    pub user_id: String,
    /// Blob storage file id of the image.
    pub image_id: String,
    /// Preview URL derived at upload time.
    pub image_url: String,
    /// Caption; empty when none was given.
    pub caption: String,
    /// Comma-joined tags.
    pub tags: String,
    /// Like counter as a decimal string.
    pub likes: String,
    /// JSON-encoded comment list.
    pub comments: String,
}

impl DishFields {
    /// Convert into the untyped attribute map sent to the document store.
    pub fn into_map(self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    /// Lenient read of a stored document.
    ///
    /// Absent or mistyped attributes fall back to the value a fresh dish
    /// would carry; a non-string `tags` attribute reads as no tags.
    fn from_data(data: &Map<String, Value>) -> Self {
        let text = |key: &str| {
            data.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let likes = match data.get(LIKES_ATTR) {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => ZERO_LIKES.to_string(),
        };
        let comments = data
            .get(COMMENTS_ATTR)
            .and_then(Value::as_str)
            .unwrap_or(EMPTY_COMMENTS)
            .to_string();

        Self {
            user_id: text(USER_ID_ATTR),
            image_id: text("imageId"),
            image_url: text("imageUrl"),
            caption: text("caption"),
            tags: text("tags"),
            likes,
            comments,
        }
    }
}

/// A dish document in persisted shape, with platform metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishDocument {
    /// Document id.
    pub id: DishId,
    /// Creation time assigned by the platform.
    pub created_at: DateTime<Utc>,
    /// Last update time assigned by the platform.
    pub updated_at: DateTime<Utc>,
    /// Stored attributes.
    pub fields: DishFields,
}

impl From<DocumentRecord> for DishDocument {
    fn from(record: DocumentRecord) -> Self {
        Self {
            fields: DishFields::from_data(&record.data),
            id: DishId::from_raw(record.id),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// A dish in domain shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    /// Document id; sorts by creation time.
    pub id: DishId,
    /// Owning user.
    pub owner_id: UserId,
    /// Image file in blob storage.
    pub image_id: Option<FileId>,
    /// Preview URL of the image.
    pub image_url: Option<String>,
    /// Caption; empty when none was given.
    pub caption: String,
    /// Tags in stored order.
    pub tags: Vec<String>,
    /// Like counter.
    pub likes: u64,
    /// Comments, oldest first.
    pub comments: Vec<Comment>,
    /// Stored counter could not be read; `likes` is a display fallback.
    #[serde(default, skip_serializing_if = "is_false")]
    pub likes_unreadable: bool,
    /// Stored list could not be read; `comments` is a display fallback.
    #[serde(default, skip_serializing_if = "is_false")]
    pub comments_unreadable: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl Dish {
    /// A dish about to be created: no likes, no comments.
    pub fn draft(
        owner_id: UserId,
        image_id: FileId,
        image_url: String,
        caption: String,
        tags: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: DishId::unique(),
            owner_id,
            image_id: Some(image_id),
            image_url: Some(image_url),
            caption,
            tags,
            likes: 0,
            comments: Vec::new(),
            likes_unreadable: false,
            comments_unreadable: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the given user owns this dish.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }
}

/// Read mapping: persisted shape to domain shape.
impl From<DishDocument> for Dish {
    fn from(doc: DishDocument) -> Self {
        let DishFields {
            user_id,
            image_id,
            image_url,
            caption,
            tags,
            likes,
            comments,
        } = doc.fields;

        let (likes, likes_unreadable) = match parse_likes(&likes) {
            Ok(n) => (n, false),
            Err(e) => {
                warn!(dish_id = %doc.id, raw = %likes, error = %e, "Unreadable like counter, showing 0");
                (0, true)
            }
        };
        let (comments, comments_unreadable) = match decode_comments(&comments) {
            Ok(list) => (list, false),
            Err(e) => {
                warn!(dish_id = %doc.id, error = %e, "Unreadable comment list, showing none");
                (Vec::new(), true)
            }
        };

        Self {
            id: doc.id,
            owner_id: UserId::from_raw(user_id),
            image_id: Some(image_id).filter(|s| !s.is_empty()).map(FileId::from_raw),
            image_url: Some(image_url).filter(|s| !s.is_empty()),
            caption,
            tags: decode_tags(&tags),
            likes,
            comments,
            likes_unreadable,
            comments_unreadable,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

impl From<DocumentRecord> for Dish {
    fn from(record: DocumentRecord) -> Self {
        DishDocument::from(record).into()
    }
}

/// Write mapping: domain shape to persisted shape.
impl TryFrom<&Dish> for DishFields {
    type Error = serde_json::Error;

    fn try_from(dish: &Dish) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: dish.owner_id.to_string(),
            image_id: dish
                .image_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            image_url: dish.image_url.clone().unwrap_or_default(),
            caption: dish.caption.clone(),
            tags: encode_tags(&dish.tags),
            likes: format_likes(dish.likes),
            comments: encode_comments(&dish.comments)?,
        })
    }
}

/// Partial update that overwrites only the like counter.
pub fn likes_patch(likes: u64) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(LIKES_ATTR.to_string(), Value::String(format_likes(likes)));
    map
}

/// Partial update that rewrites the whole comment list.
pub fn comments_patch(comments: &[Comment]) -> Result<Map<String, Value>, serde_json::Error> {
    let mut map = Map::new();
    map.insert(
        COMMENTS_ATTR.to_string(),
        Value::String(encode_comments(comments)?),
    );
    Ok(map)
}

/// Read the like counter of a raw document, if it is readable.
pub fn stored_likes(record: &DocumentRecord) -> Option<u64> {
    record.data.get(LIKES_ATTR).and_then(likes_from_value)
}
