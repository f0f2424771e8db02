use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::error::AppError;
use crate::profile::Profile;
use crate::routes::AppState;

pub const LOGIN_PATH: &str = "/auth/login";

/// Paths reachable without a profile in the session.
fn is_public_path(path: &str) -> bool {
    matches!(path, LOGIN_PATH | "/auth/callback" | "/health" | "/ready")
        || path.starts_with("/static/")
}

/// Gate in front of every route.
///
/// The session is read first on every path, and an unreadable session cookie
/// is a 500. A profile found there is handed to handlers through the request
/// extensions ([`AuthUser`]). Without one, public paths still pass and
/// everything else gets a 303 to the login page with an empty body.
pub async fn auth_gate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = state.sessions.load(req.headers())?;

    let Some(profile) = session.profile() else {
        if is_public_path(req.uri().path()) {
            return Ok(next.run(req).await);
        }

        tracing::debug!(path = %req.uri().path(), "no profile in session, redirecting to login");

        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    req.extensions_mut().insert(profile.clone());

    Ok(next.run(req).await)
}

/// Profile of the signed in user, placed by [`auth_gate`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Profile);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Profile>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| Redirect::to(LOGIN_PATH))
    }
}
