//! Convenience result type aliases for DishHub.

use crate::error::{AppError, PlatformError};

/// A specialized `Result` type for DishHub operations.
pub type AppResult<T> = Result<T, AppError>;

/// Result of a single call against the hosted platform.
///
/// Only the backend capability traits return this; everything above the
/// content repository and session manager sees [`AppResult`].
pub type PlatformResult<T> = Result<T, PlatformError>;
