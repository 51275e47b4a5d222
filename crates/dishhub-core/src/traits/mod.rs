//! Backend capability traits defined in `dishhub-core` and implemented by
//! `dishhub-platform`.

pub mod account;
pub mod blobs;
pub mod documents;

pub use account::{AccountService, SessionTarget};
pub use blobs::BlobStore;
pub use documents::DocumentStore;
