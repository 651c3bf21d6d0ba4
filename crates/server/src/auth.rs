//! Page guard middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::COOKIE, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use gametrack_core::{AuthUser, Navigation};
use tracing::debug;

use crate::state::AppState;

/// The session user, taken from the `name` cookie when it is non-empty.
pub fn session_user(headers: &HeaderMap, name: &str) -> Option<AuthUser> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| AuthUser {
            token: value.to_string(),
        })
}

fn is_unguarded(path: &str) -> bool {
    path == "/health" || path == "/api" || path.starts_with("/api/")
}

/// Redirect page navigations according to the route guard.
pub async fn guard_pages(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if is_unguarded(&path) {
        return next.run(request).await;
    }

    let user = session_user(request.headers(), &state.session_cookie);
    match state.guard.check(user.as_ref(), &path) {
        Navigation::Proceed => next.run(request).await,
        Navigation::Redirect(to) => {
            debug!(from = %path, %to, authenticated = user.is_some(), "Redirecting");
            Redirect::to(&to).into_response()
        }
    }
}
