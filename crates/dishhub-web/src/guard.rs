//! Route guard over the session snapshot.

use std::sync::Arc;

use dishhub_auth::session::{AuthSnapshot, SessionManager};
use dishhub_core::result::AppResult;

use crate::router::{Resolution, Route, RouteTable};

/// Where unauthenticated visitors of a protected route are sent.
pub const LOGIN_PATH: &str = "/login";

/// What to show for a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the route.
    Render(Route),
    /// The session is still resolving; show a neutral waiting state.
    Wait,
    /// Navigate elsewhere.
    Redirect(String),
}

/// Pure guard decision for one route.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    pub fn decide(route: Route, auth: AuthSnapshot) -> GuardDecision {
        if !route.is_protected() {
            return GuardDecision::Render(route);
        }
        if auth.loading {
            return GuardDecision::Wait;
        }
        if auth.is_authenticated {
            GuardDecision::Render(route)
        } else {
            tracing::debug!(route = %route, "Protected route, redirecting to sign-in");
            GuardDecision::Redirect(LOGIN_PATH.to_string())
        }
    }
}

/// Route table plus the session it guards against.
#[derive(Debug)]
pub struct GuardedRouter {
    table: RouteTable,
    session: Arc<SessionManager>,
}

impl GuardedRouter {
    pub fn new(session: Arc<SessionManager>) -> AppResult<Self> {
        Ok(Self {
            table: RouteTable::new()?,
            session,
        })
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Decide with the session as it is right now.
    pub fn navigate(&self, path: &str) -> GuardDecision {
        match self.table.resolve(path) {
            Resolution::Route(route) => RouteGuard::decide(route, self.session.snapshot()),
            Resolution::Redirect(to) => GuardDecision::Redirect(to),
        }
    }

    /// Decide once the session has settled.
    pub async fn navigate_resolved(&self, path: &str) -> GuardDecision {
        match self.table.resolve(path) {
            Resolution::Route(route) if route.is_protected() => {
                let state = self.session.resolved().await;
                RouteGuard::decide(route, state.snapshot())
            }
            Resolution::Route(route) => GuardDecision::Render(route),
            Resolution::Redirect(to) => GuardDecision::Redirect(to),
        }
    }
}
