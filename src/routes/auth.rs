//! Sign in through the identity provider, sign out.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::LOGIN_PATH;
use crate::oauth::OAuthError;
use crate::routes::AppState;
use crate::session::{Session, SessionData};
use crate::template::Template;

#[derive(askama::Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub client_id: String,
    pub domain: String,
    pub callback_url: String,
    pub authorize_url: String,
}

pub async fn login(template: Template, State(app): State<AppState>) -> impl IntoResponse {
    template.render(LoginTemplate {
        client_id: app.oauth.client_id().to_owned(),
        domain: app.config.auth.domain.to_owned(),
        callback_url: app.oauth.callback_url().to_owned(),
        authorize_url: app.oauth.authorize_url().to_string(),
    })
}

/// Forgets the session and signs out of the provider, which sends the browser
/// back to the login page.
pub async fn logout(State(app): State<AppState>, session: Session) -> impl IntoResponse {
    let return_to = format!(
        "{}{LOGIN_PATH}",
        app.config.server.base_url.trim_end_matches('/')
    );
    let logout_url = app.oauth.logout_url(&return_to);

    if let Some(profile) = session.profile() {
        tracing::info!(user_id = %profile.user_id, "signed out");
    }

    (session.clear(), Redirect::to(logout_url.as_str()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CallbackQuery {
    pub code: String,
    pub error: String,
    pub error_description: String,
}

/// Exchanges the authorization code, fetches the profile and stores both in a
/// fresh session. Nothing is written to the cookie unless every step succeeds.
pub async fn callback(
    State(app): State<AppState>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if !query.error.is_empty() {
        return Err(OAuthError::Denied {
            error: query.error,
            description: query.error_description,
        }
        .into());
    }

    if query.code.is_empty() {
        return Err(OAuthError::MissingCode.into());
    }

    let token = app.oauth.exchange_code(&query.code).await?;
    let profile = app.oauth.user_info(&token.access_token).await?;

    if profile.email.is_empty() {
        return Err(OAuthError::MissingEmail.into());
    }

    tracing::info!(user_id = %profile.user_id, email = %profile.email, "signed in");

    let jar = app.sessions.start(&headers).save(SessionData {
        id_token: token.id_token,
        access_token: Some(token.access_token),
        profile: Some(profile),
    })?;

    Ok((jar, Redirect::to("/")).into_response())
}
