//! # dishhub-entity
//!
//! Domain models for DishHub. A dish has two shapes: the persisted
//! [`dish::DishFields`] (stringly-typed, exactly what the document store
//! holds) and the domain [`dish::Dish`]. Mapping between them happens only
//! in this crate.

pub mod dish;
pub mod user;
