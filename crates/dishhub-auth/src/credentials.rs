//! Sign-up and sign-in form checks, run before any network call.

use validator::{Validate, ValidationErrors};

use dishhub_core::error::AppError;
use dishhub_core::result::AppResult;

/// Input of the sign-up form.
#[derive(Debug, Clone, Validate)]
pub struct SignUpForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Please enter a valid email address")
    )]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl SignUpForm {
    /// Build a form, trimming the name and email.
    pub fn new(
        name: impl AsRef<str>,
        email: impl AsRef<str>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            email: email.as_ref().trim().to_string(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Check the form, reporting one problem at a time.
    ///
    /// A confirmation mismatch is reported before password length, then
    /// email, then name.
    pub fn check(&self) -> AppResult<()> {
        self.validate().map_err(|errors| {
            first_message(
                &errors,
                &["confirm_password", "password", "email", "name"],
            )
        })
    }
}

/// Input of the sign-in form.
#[derive(Debug, Clone, Validate)]
pub struct SignInForm {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl SignInForm {
    pub fn new(email: impl AsRef<str>, password: impl Into<String>) -> Self {
        Self {
            email: email.as_ref().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn check(&self) -> AppResult<()> {
        self.validate()
            .map_err(|errors| first_message(&errors, &["email", "password"]))
    }
}

fn first_message(errors: &ValidationErrors, priority: &[&str]) -> AppError {
    let fields = errors.field_errors();
    let message = priority
        .iter()
        .find_map(|field| {
            fields
                .get(*field)
                .and_then(|list| list.first())
                .map(|err| {
                    err.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {field}"))
                })
        })
        .unwrap_or_else(|| "Invalid input".to_string());
    AppError::validation(message)
}
