pub mod auth;
pub mod cache;

pub use auth::{AuthUser, LOGIN_PATH, auth_gate};
pub use cache::cache_control_middleware;
