use axum::{
    Router,
    extract::FromRef,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Response,
    routing::get,
};
use sqlx::SqlitePool;

use crate::assets::AssetsService;
use crate::config::Config;
use crate::oauth::OAuthClient;
use crate::session::SessionStore;
use crate::template::{NotFoundTemplate, Template};

mod auth;
mod events;
mod health;
mod index;

/// Built once at startup, cloned into every handler.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Config,
    pub pool: SqlitePool,
    pub oauth: OAuthClient,
    pub sessions: SessionStore,
}

pub async fn fallback(template: Template) -> Response {
    let mut response = template.render(NotFoundTemplate);
    if response.status().is_success() {
        *response.status_mut() = StatusCode::NOT_FOUND;
    }

    response
}

/// Every route sits behind [`crate::middleware::auth_gate`], unknown paths included.
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/", get(index::page))
        .route("/auth/login", get(auth::login))
        .route("/auth/logout", get(auth::logout))
        .route("/auth/callback", get(auth::callback))
        .route("/create", get(events::create_page).post(events::create_action))
        .route("/events", get(events::list))
        .route("/events/{id}", get(events::detail))
        .nest_service("/static", AssetsService::new())
        .fallback(fallback)
        .layer(from_fn_with_state(
            app_state.clone(),
            crate::middleware::auth_gate,
        ))
        .with_state(app_state)
}
