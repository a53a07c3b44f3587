//! Routes and the dashboard guard

/// A client view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
        }
    }

    /// Whether the view needs a session token
    pub fn is_protected(self) -> bool {
        matches!(self, Route::Dashboard)
    }
}

/// Map a requested path to the view that will actually be shown.
///
/// `/` defaults to the dashboard, and protected views fall back to the
/// login form when no token is present. Presence is all that is checked.
pub fn resolve(path: &str, authenticated: bool) -> Option<Route> {
    let requested = match path.trim_end_matches('/') {
        "" | "/dashboard" => Route::Dashboard,
        "/login" => Route::Login,
        _ => return None,
    };
    Some(guard(requested, authenticated))
}

/// Redirect protected routes to the login form when unauthenticated
pub fn guard(route: Route, authenticated: bool) -> Route {
    if route.is_protected() && !authenticated {
        tracing::debug!("No session token, redirecting {} to login", route.path());
        Route::Login
    } else {
        route
    }
}
