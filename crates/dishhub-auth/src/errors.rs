//! Mapping of platform failures during authentication flows.

use dishhub_core::error::{AppError, ErrorKind, PlatformError};

/// Message shown for a failed authentication call.
pub fn auth_message(err: &PlatformError) -> String {
    match err {
        PlatformError::Api { error_type, .. } if error_type == "user_invalid_credentials" => {
            "Invalid email or password.".to_string()
        }
        PlatformError::Api { error_type, .. } if error_type == "user_already_exists" => {
            "An account with this email already exists.".to_string()
        }
        PlatformError::Api { error_type, .. } if error_type == "user_session_already_exists" => {
            "You are already signed in.".to_string()
        }
        PlatformError::Api { code: 401, .. } => "Invalid email or password.".to_string(),
        PlatformError::Api { code: 409, .. } => {
            "An account with this email already exists.".to_string()
        }
        PlatformError::Api { code: 429, .. } => {
            "Too many attempts. Please wait a moment and try again.".to_string()
        }
        PlatformError::Network(_) => {
            "Unable to reach the server. Please check your connection.".to_string()
        }
        other => other.user_message(),
    }
}

/// Normalize a platform failure into an authentication error.
pub fn auth_error(context: &str, err: PlatformError) -> AppError {
    tracing::warn!(error = %err, "{context}");
    AppError::with_source(ErrorKind::Authentication, auth_message(&err), err)
}
