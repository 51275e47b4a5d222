//! Authentication states observed by the rest of the client.

use dishhub_entity::user::User;

/// Where the client stands with the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// A sign-in, sign-up, sign-out or startup check is in flight.
    Pending,
    /// No signed-in user.
    Anonymous,
    /// A user is signed in.
    Authenticated(User),
}

impl SessionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// The two flags route guards decide on.
    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            is_authenticated: self.is_authenticated(),
            loading: self.is_pending(),
        }
    }

    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Anonymous => "anonymous",
            Self::Authenticated(_) => "authenticated",
        }
    }
}

/// Guard input derived from a [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthSnapshot {
    pub is_authenticated: bool,
    pub loading: bool,
}
