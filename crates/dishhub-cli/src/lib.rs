//! # dishhub-cli
//!
//! Command-line front end for DishHub: account commands, the dish feed,
//! uploads, likes and comments, configuration checks and route checks.

pub mod commands;
pub mod context;
pub mod output;

pub use commands::Cli;
pub use context::CliContext;
