//! Navigation guard deciding between the login page and protected pages.

/// An authenticated user as supplied by the external session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Opaque session token; only its presence matters here.
    pub token: String,
}

/// Outcome of evaluating a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Let the request through unchanged.
    Proceed,
    /// Redirect to the given path.
    Redirect(String),
}

/// Redirects unauthenticated users to the login page and authenticated users
/// away from it.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_path: String,
    landing_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new("/login", "/dashboard")
    }
}

impl RouteGuard {
    /// Build a guard with explicit login and landing paths.
    pub fn new(login_path: impl Into<String>, landing_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            landing_path: landing_path.into(),
        }
    }

    /// Path of the login page.
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Evaluate a single navigation to `path`.
    pub fn check(&self, user: Option<&AuthUser>, path: &str) -> Navigation {
        let on_login = path == self.login_path;
        match (user, on_login) {
            (None, false) => Navigation::Redirect(self.login_path.clone()),
            (Some(_), true) => Navigation::Redirect(self.landing_path.clone()),
            _ => Navigation::Proceed,
        }
    }
}
