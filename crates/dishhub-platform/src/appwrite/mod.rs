//! Hosted platform over its REST API.

pub mod account;
pub mod client;
pub mod databases;
pub mod storage;

pub use account::AppwriteAccount;
pub use client::AppwriteClient;
pub use databases::AppwriteDatabases;
pub use storage::AppwriteStorage;
