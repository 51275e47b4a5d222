//! Dish content repository and upload input handling.

pub mod service;
pub mod upload;

pub use service::{DishService, ensure_owner};
pub use upload::{ImageUpload, parse_tag_input};
