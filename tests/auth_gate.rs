//! Every route sits behind the session gate, only the login flow, static
//! assets and probes are reachable without a profile.

mod helpers;

use axum::http::{StatusCode, header};
use helpers::{TestApp, body_string, cookie_pair, jane, location};

#[tokio::test]
async fn protected_paths_redirect_to_login_with_empty_body() {
    let app = TestApp::new().await;

    for path in [
        "/",
        "/events",
        "/events/1",
        "/create",
        "/auth/logout",
        "/no-such-page",
    ] {
        let response = app.get(path, None).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), Some("/auth/login"), "{path}");
        assert!(body_string(response).await.is_empty(), "{path}");
    }
}

#[tokio::test]
async fn login_page_is_public_and_shows_client_parameters() {
    let app = TestApp::new().await;

    let response = app.get("/auth/login", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("test-client"));
    assert!(body.contains("tenant.example.com"));
    assert!(body.contains("https://tenant.example.com/authorize?response_type=code"));
    assert!(!body.contains("test-secret"));
}

#[tokio::test]
async fn static_assets_and_probes_are_public() {
    let app = TestApp::new().await;

    let response = app.get("/static/css/main.css", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
    assert!(
        response.headers()[header::CACHE_CONTROL]
            .to_str()
            .unwrap()
            .starts_with("public")
    );

    assert_eq!(app.get("/health", None).await.status(), StatusCode::OK);
    assert_eq!(app.get("/ready", None).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn signed_in_request_reaches_handler_without_touching_session() {
    let app = TestApp::new().await;
    let cookie = app.signed_in(jane());

    let response = app.get("/", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(cookie_pair(&response).is_none());
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store, no-cache, must-revalidate");

    let body = body_string(response).await;
    assert!(body.contains("Jane Doe"));
    assert!(body.contains("jane@example.com"));
}

#[tokio::test]
async fn unknown_path_for_signed_in_user_is_not_found() {
    let app = TestApp::new().await;
    let cookie = app.signed_in(jane());

    let response = app.get("/no-such-page", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("Page not found"));
}

#[tokio::test]
async fn unreadable_session_is_a_server_error() {
    let app = TestApp::new().await;

    let response = app.get("/events", Some("auth-session=garbage")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(location(&response).is_none());
    assert!(body_string(response).await.contains("Session error"));
}

#[tokio::test]
async fn unreadable_session_fails_on_public_paths_too() {
    let app = TestApp::new().await;

    for path in ["/auth/login", "/static/css/main.css"] {
        let response = app.get(path, Some("auth-session=garbage")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{path}");
        assert!(location(&response).is_none());
    }
}

#[tokio::test]
async fn logout_expires_session_and_signs_out_of_provider() {
    let app = TestApp::new().await;
    let cookie = app.signed_in(jane());

    let response = app.get("/auth/logout", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let target = url::Url::parse(location(&response).unwrap()).unwrap();
    assert_eq!(target.host_str(), Some("tenant.example.com"));
    assert_eq!(target.path(), "/v2/logout");

    let query = target.query_pairs().into_owned().collect::<Vec<_>>();
    assert!(query.contains(&(
        "returnTo".to_owned(),
        "http://localhost:3000/auth/login".to_owned()
    )));
    assert!(query.contains(&("client_id".to_owned(), "test-client".to_owned())));

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("auth-session="));
    assert!(set_cookie.contains("Max-Age=0"));
}
