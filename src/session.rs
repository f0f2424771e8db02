//! Cookie backed session store.
//!
//! The whole session lives in a single encrypted and authenticated cookie
//! (`auth-session`) holding [`SessionData`] as JSON.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::{
    CookieJar, PrivateCookieJar,
    cookie::{Cookie, Key, SameSite},
};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_512};
use thiserror::Error;

use crate::error::AppError;
use crate::profile::Profile;
use crate::routes::AppState;

pub const SESSION_COOKIE_NAME: &str = "auth-session";

const SESSION_MAX_AGE_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session cookie could not be authenticated")]
    Tampered,

    #[error("session cookie could not be decoded: {0}")]
    Codec(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub id_token: Option<String>,
    pub access_token: Option<String>,
    pub profile: Option<Profile>,
}

#[derive(Clone)]
pub struct SessionStore {
    key: Key,
    secure: bool,
}

impl SessionStore {
    /// The cookie key is derived from `secret` with SHA3-512, which yields the
    /// 64 bytes the cookie encryption requires.
    pub fn new(secret: &str, secure: bool) -> Self {
        let digest = Sha3_512::digest(secret.as_bytes());

        Self {
            key: Key::from(digest.as_slice()),
            secure,
        }
    }

    pub fn load(&self, headers: &HeaderMap) -> Result<Session, SessionError> {
        let jar = PrivateCookieJar::from_headers(headers, self.key.clone());

        let data = match jar.get(SESSION_COOKIE_NAME) {
            Some(cookie) => serde_json::from_str(cookie.value())?,
            None if CookieJar::from_headers(headers)
                .get(SESSION_COOKIE_NAME)
                .is_some() =>
            {
                return Err(SessionError::Tampered);
            }
            None => SessionData::default(),
        };

        Ok(Session {
            jar,
            data,
            secure: self.secure,
        })
    }

    /// Empty session that replaces whatever cookie the request carried, readable or not.
    pub fn start(&self, headers: &HeaderMap) -> Session {
        Session {
            jar: PrivateCookieJar::from_headers(headers, self.key.clone()),
            data: SessionData::default(),
            secure: self.secure,
        }
    }
}

/// Session of the current request.
///
/// Nothing is written back unless the jar returned by [`Session::save`] or
/// [`Session::clear`] is part of the response.
pub struct Session {
    jar: PrivateCookieJar,
    data: SessionData,
    secure: bool,
}

impl Session {
    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.data.profile.as_ref()
    }

    pub fn save(self, data: SessionData) -> Result<PrivateCookieJar, SessionError> {
        let value = serde_json::to_string(&data)?;
        let cookie = Cookie::build((SESSION_COOKIE_NAME, value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::days(SESSION_MAX_AGE_DAYS))
            .build();

        Ok(self.jar.add(cookie))
    }

    pub fn clear(self) -> PrivateCookieJar {
        self.jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"))
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(state.sessions.load(&parts.headers)?)
    }
}
