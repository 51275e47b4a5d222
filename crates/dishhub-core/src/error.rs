//! Unified application error types for DishHub.
//!
//! Platform calls fail with [`PlatformError`]. The content repository and
//! the session manager translate those into [`AppError`] through
//! [`AppError::from_platform`], so callers above that boundary never see a
//! raw platform error shape.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested dish, comment, or account was not found.
    NotFound,
    /// Authentication failed (bad credentials, duplicate account, rate limit).
    Authentication,
    /// The caller may not perform the action.
    Authorization,
    /// Client-side input checks failed; raised before any network call.
    Validation,
    /// A read against the platform failed.
    Fetch,
    /// Writing the image blob or the new dish document failed.
    Upload,
    /// A like, comment, or delete write failed.
    Update,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Fetch => write!(f, "FETCH"),
            Self::Upload => write!(f, "UPLOAD"),
            Self::Update => write!(f, "UPDATE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Error returned by a backend capability call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    /// The platform answered with an error response.
    #[error("platform error {code} ({error_type}): {message}")]
    Api {
        /// HTTP-style status code.
        code: u16,
        /// Machine-readable error type, e.g. `document_not_found`.
        error_type: String,
        /// Message reported by the platform.
        message: String,
    },
    /// The platform could not be reached.
    #[error("network error: {0}")]
    Network(String),
    /// The request could not be built.
    #[error("invalid platform request: {0}")]
    InvalidRequest(String),
    /// The platform answered with something that could not be decoded.
    #[error("invalid platform response: {0}")]
    InvalidResponse(String),
}

impl PlatformError {
    /// Shorthand for an [`PlatformError::Api`] error.
    pub fn api(code: u16, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            error_type: error_type.into(),
            message: message.into(),
        }
    }

    /// Status code of an API error.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Platform error type of an API error.
    pub fn error_type(&self) -> Option<&str> {
        match self {
            Self::Api { error_type, .. } => Some(error_type),
            _ => None,
        }
    }

    /// Whether the platform reported the addressed resource as absent.
    pub fn is_not_found(&self) -> bool {
        self.code() == Some(404)
    }

    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { code, .. } => *code == 429 || *code >= 500,
            Self::InvalidRequest(_) | Self::InvalidResponse(_) => false,
        }
    }

    /// The message shown to a user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { code: 401, .. } => "Authentication failed. Please log in again.".to_string(),
            Self::Api { code: 403, .. } => {
                "Permission denied. Please check your access rights.".to_string()
            }
            Self::Api { code: 404, .. } => "Resource not found.".to_string(),
            Self::Api { code: 429, .. } => "Too many requests. Please try again later.".to_string(),
            Self::Api { code: 503, .. } => "Service unavailable. Please try again later.".to_string(),
            Self::Api { message, .. } if !message.is_empty() => format!("Error: {message}"),
            Self::Api { .. } => "Error: Unknown error occurred".to_string(),
            Self::Network(_) => "Network error. Please check your internet connection.".to_string(),
            Self::InvalidRequest(_) | Self::InvalidResponse(_) => {
                "An unexpected error occurred. Please try again.".to_string()
            }
        }
    }
}

/// The unified application error used throughout DishHub.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Normalize a platform failure into the operation's declared kind.
    ///
    /// A platform 404 always becomes [`ErrorKind::NotFound`]. The raw error
    /// is logged here and kept as the source.
    pub fn from_platform(kind: ErrorKind, context: &str, err: PlatformError) -> Self {
        tracing::error!(error = %err, kind = %kind, "{context}");
        let kind = if err.is_not_found() {
            ErrorKind::NotFound
        } else {
            kind
        };
        let message = format!("{context}: {}", err.user_message());
        Self::with_source(kind, message, err)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a fetch error.
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Fetch, message)
    }

    /// Create an upload error.
    pub fn upload(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Upload, message)
    }

    /// Create an update error.
    pub fn update(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Update, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error belongs to the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
