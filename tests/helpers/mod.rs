//! Shared setup for the integration tests: in-memory database, app router,
//! session cookies and a stand-in identity provider.

#![allow(dead_code)]

use axum::{
    Form, Json, Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use http_body_util::BodyExt;
use protestpulse::{
    AppState,
    config::{AuthConfig, Config, DatabaseConfig, LoggingConfig, ServerConfig, SessionConfig},
    profile::Profile,
    session::{SessionData, SessionStore},
};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const COOKIE_KEY: &str = "test_cookie_key_minimum_32_characters_long";
pub const GOOD_CODE: &str = "good-code";
pub const ACCESS_TOKEN: &str = "access-123";
pub const ID_TOKEN: &str = "id-token-456";

pub fn test_config(provider_url: Option<String>) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        auth: AuthConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            domain: "tenant.example.com".to_string(),
            callback_url: "http://localhost:3000/auth/callback".to_string(),
            provider_url,
            scopes: "openid profile email".to_string(),
            timeout_secs: 5,
        },
        session: SessionConfig {
            cookie_key: COOKIE_KEY.to_string(),
            secure: false,
        },
        logging: LoggingConfig::default(),
    }
}

/// Single connection, every connection to `sqlite::memory:` is its own database.
pub async fn test_pool() -> SqlitePool {
    let pool = protestpulse::db::create_pool("sqlite::memory:", 1)
        .await
        .expect("Failed to create test database");
    protestpulse::db::migrate(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub sessions: SessionStore,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_provider(None).await
    }

    pub async fn with_provider(provider_url: Option<String>) -> Self {
        let pool = test_pool().await;
        let state: AppState = protestpulse::build_state(test_config(provider_url), pool.clone())
            .expect("Failed to build state");
        let sessions = state.sessions.clone();

        Self {
            router: protestpulse::create_app(state),
            pool,
            sessions,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }

        self.router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_form(&self, uri: &str, cookie: &str, fields: &[(&str, &str)]) -> Response {
        let body = serde_urlencoded::to_string(fields).unwrap();

        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::COOKIE, cookie)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// `Cookie` header value of a session holding `profile`.
    pub fn signed_in(&self, profile: Profile) -> String {
        let jar = self
            .sessions
            .start(&HeaderMap::new())
            .save(SessionData {
                id_token: Some(ID_TOKEN.to_owned()),
                access_token: Some(ACCESS_TOKEN.to_owned()),
                profile: Some(profile),
            })
            .unwrap();

        cookie_pair(&(jar, "").into_response()).expect("session cookie")
    }

    pub async fn count(&self, table: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .unwrap();
        count
    }
}

pub fn jane() -> Profile {
    Profile {
        user_id: "auth0|jane".to_owned(),
        email: "jane@example.com".to_owned(),
        given_name: "Jane".to_owned(),
        family_name: "Doe".to_owned(),
        picture: String::new(),
    }
}

/// `name=value` of the response `Set-Cookie` header.
pub fn cookie_pair(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_owned)
}

pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[derive(Deserialize)]
struct TokenForm {
    grant_type: String,
    client_id: String,
    client_secret: String,
    code: String,
}

async fn token(Form(form): Form<TokenForm>) -> Response {
    let accepted = form.grant_type == "authorization_code"
        && form.client_id == "test-client"
        && form.client_secret == "test-secret"
        && form.code == GOOD_CODE;

    if !accepted {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "invalid_grant", "error_description": "Invalid authorization code"})),
        )
            .into_response();
    }

    Json(json!({
        "access_token": ACCESS_TOKEN,
        "id_token": ID_TOKEN,
        "token_type": "Bearer",
        "expires_in": 86400
    }))
    .into_response()
}

async fn userinfo(headers: HeaderMap) -> Response {
    let expected = format!("Bearer {ACCESS_TOKEN}");
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str());

    if !authorized {
        return (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
    }

    Json(json!({
        "sub": "auth0|jane",
        "email": "jane@example.com",
        "given_name": "Jane",
        "family_name": "Doe",
        "picture": "https://example.com/jane.png"
    }))
    .into_response()
}

/// Identity provider serving `/oauth/token` and `/userinfo` on a random local
/// port. Returns its base url.
pub async fn spawn_provider() -> String {
    spawn(
        Router::new()
            .route("/oauth/token", post(token))
            .route("/userinfo", get(userinfo)),
    )
    .await
}

/// Provider whose `/userinfo` answers `body` with status 200.
pub async fn spawn_provider_with_userinfo(body: &'static str) -> String {
    spawn(
        Router::new()
            .route("/oauth/token", post(token))
            .route("/userinfo", get(move || async move { body })),
    )
    .await
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}
