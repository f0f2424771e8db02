mod helpers;

use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use helpers::{
    ACCESS_TOKEN, GOOD_CODE, ID_TOKEN, TestApp, body_string, cookie_pair, jane, location,
    spawn_provider, spawn_provider_with_userinfo,
};

#[tokio::test]
async fn callback_stores_tokens_and_profile_then_redirects_home() {
    let app = TestApp::with_provider(Some(spawn_provider().await)).await;

    let response = app
        .get(&format!("/auth/callback?code={GOOD_CODE}"), None)
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    let cookie = cookie_pair(&response).expect("session cookie");
    assert!(cookie.starts_with("auth-session="));

    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(&cookie).unwrap());
    let session = app.sessions.load(&headers).unwrap();
    let data = session.data();

    assert_eq!(data.access_token.as_deref(), Some(ACCESS_TOKEN));
    assert_eq!(data.id_token.as_deref(), Some(ID_TOKEN));

    let profile = data.profile.as_ref().unwrap();
    assert_eq!(profile.user_id, "auth0|jane");
    assert_eq!(profile.email, "jane@example.com");
    assert_eq!(profile.picture, "https://example.com/jane.png");

    let home = app.get("/", Some(&cookie)).await;
    assert_eq!(home.status(), StatusCode::OK);
    assert!(body_string(home).await.contains("Jane Doe"));
}

#[tokio::test]
async fn invalid_code_fails_without_touching_existing_session() {
    let app = TestApp::with_provider(Some(spawn_provider().await)).await;
    let cookie = app.signed_in(jane());

    let response = app
        .get("/auth/callback?code=forged", Some(&cookie))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(location(&response).is_none());
    assert!(cookie_pair(&response).is_none());
    assert!(body_string(response).await.contains("invalid_grant"));

    assert_eq!(app.get("/", Some(&cookie)).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_code_is_a_server_error() {
    let app = TestApp::new().await;

    let response = app.get("/auth/callback", None).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(cookie_pair(&response).is_none());
    assert!(body_string(response).await.contains("missing authorization code"));
}

#[tokio::test]
async fn provider_error_is_reported() {
    let app = TestApp::new().await;

    let response = app
        .get(
            "/auth/callback?error=access_denied&error_description=User%20cancelled",
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(cookie_pair(&response).is_none());
    assert!(body_string(response).await.contains("access_denied"));
}

#[tokio::test]
async fn malformed_userinfo_is_a_server_error() {
    let provider = spawn_provider_with_userinfo("{not json").await;
    let app = TestApp::with_provider(Some(provider)).await;

    let response = app
        .get(&format!("/auth/callback?code={GOOD_CODE}"), None)
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(cookie_pair(&response).is_none());
    assert!(body_string(response).await.contains("malformed"));
}

#[tokio::test]
async fn profile_without_email_is_refused() {
    let provider = spawn_provider_with_userinfo(r#"{"sub":"auth0|anon"}"#).await;
    let app = TestApp::with_provider(Some(provider)).await;

    let response = app
        .get(&format!("/auth/callback?code={GOOD_CODE}"), None)
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(cookie_pair(&response).is_none());
}

#[tokio::test]
async fn unreachable_provider_is_a_server_error() {
    let app = TestApp::with_provider(Some("http://127.0.0.1:9".to_owned())).await;

    let response = app
        .get(&format!("/auth/callback?code={GOOD_CODE}"), None)
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(cookie_pair(&response).is_none());
}
