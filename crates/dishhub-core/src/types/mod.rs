//! Shared value types: identifiers, list queries, and platform records.

pub mod id;
pub mod query;
pub mod record;

pub use id::{CommentId, DishId, FileId, SessionId, UserId};
pub use query::Query;
pub use record::{
    AccountRecord, DocumentList, DocumentRecord, FileRecord, FileUpload, PreviewOptions,
    SessionRecord,
};
