//! Route table: maps URL paths to views.
//!
//! Unknown paths, and dish paths whose id is not a valid identifier,
//! redirect to the home page.

use std::fmt;

use matchit::Router;

use dishhub_core::error::AppError;
use dishhub_core::result::AppResult;
use dishhub_core::types::id::DishId;

/// Where unknown paths are sent.
pub const HOME_PATH: &str = "/";

/// A view the client can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Signup,
    Explore,
    Profile,
    Upload,
    DishDetail(DishId),
}

impl Route {
    /// Canonical path of this route.
    pub fn path(&self) -> String {
        match self {
            Self::Home => HOME_PATH.to_string(),
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::Explore => "/explore".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::Upload => "/upload".to_string(),
            Self::DishDetail(id) => format!("/dish/{id}"),
        }
    }

    /// Whether the route requires a signed-in user.
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Profile | Self::Upload)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteKind {
    Home,
    Login,
    Signup,
    Explore,
    Profile,
    Upload,
    DishDetail,
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The path names a view.
    Route(Route),
    /// The path names nothing; go here instead.
    Redirect(String),
}

/// Path matcher over the client's routes.
pub struct RouteTable {
    router: Router<RouteKind>,
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable").finish_non_exhaustive()
    }
}

impl RouteTable {
    pub fn new() -> AppResult<Self> {
        let mut router = Router::new();
        for (path, kind) in [
            ("/", RouteKind::Home),
            ("/login", RouteKind::Login),
            ("/signup", RouteKind::Signup),
            ("/explore", RouteKind::Explore),
            ("/profile", RouteKind::Profile),
            ("/upload", RouteKind::Upload),
            ("/dish/{id}", RouteKind::DishDetail),
        ] {
            router.insert(path, kind).map_err(|e| {
                AppError::internal(format!("Failed to register route '{path}': {e}"))
            })?;
        }
        Ok(Self { router })
    }

    /// Resolve a path, ignoring any query string or fragment and a
    /// trailing slash.
    pub fn resolve(&self, path: &str) -> Resolution {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => HOME_PATH,
            trimmed => trimmed,
        };

        let Ok(matched) = self.router.at(path) else {
            tracing::debug!(path, "Unknown path, redirecting home");
            return Resolution::Redirect(HOME_PATH.to_string());
        };

        let route = match matched.value {
            RouteKind::Home => Route::Home,
            RouteKind::Login => Route::Login,
            RouteKind::Signup => Route::Signup,
            RouteKind::Explore => Route::Explore,
            RouteKind::Profile => Route::Profile,
            RouteKind::Upload => Route::Upload,
            RouteKind::DishDetail => {
                match matched.params.get("id").map(str::parse::<DishId>) {
                    Some(Ok(id)) => Route::DishDetail(id),
                    _ => return Resolution::Redirect(HOME_PATH.to_string()),
                }
            }
        };
        Resolution::Route(route)
    }
}
