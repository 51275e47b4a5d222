//! Dish domain entities and the codecs of their persisted attributes.

pub mod comment;
pub mod likes;
pub mod model;
pub mod tags;

pub use comment::Comment;
pub use model::{Dish, DishDocument, DishFields};
