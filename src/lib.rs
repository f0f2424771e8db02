pub mod assets;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod form;
pub mod middleware;
pub mod oauth;
pub mod observability;
pub mod profile;
pub mod query;
pub mod routes;
pub mod session;
pub mod template;

pub use routes::AppState;

/// Application state ready to serve, built from validated configuration.
pub fn build_state(config: config::Config, pool: sqlx::SqlitePool) -> anyhow::Result<AppState> {
    let oauth = oauth::OAuthClient::new(&config.auth)?;
    let sessions = session::SessionStore::new(&config.session.cookie_key, config.session.secure);

    Ok(AppState {
        config,
        pool,
        oauth,
        sessions,
    })
}

/// Router with every application layer, as served.
pub fn create_app(state: AppState) -> axum::Router {
    use tower_http::{
        catch_panic::CatchPanicLayer, compression::CompressionLayer, trace::TraceLayer,
    };

    routes::router(state)
        .layer(axum::middleware::from_fn(
            middleware::cache_control_middleware,
        ))
        .layer(CompressionLayer::new().br(true).gzip(true))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}
