//! # dishhub-auth
//!
//! Authentication for the DishHub client.
//!
//! ## Modules
//!
//! - `session`: signed-in user state machine (pending, anonymous, authenticated)
//! - `retry`: injectable retry policy used for account creation
//! - `credentials`: sign-up and sign-in form checks
//! - `errors`: platform failure to authentication error mapping

pub mod credentials;
pub mod errors;
pub mod retry;
pub mod session;

pub use credentials::{SignInForm, SignUpForm};
pub use retry::RetryPolicy;
pub use session::{AuthSnapshot, SessionManager, SessionState};
