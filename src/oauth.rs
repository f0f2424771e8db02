//! Authorization code client for the identity provider.
//!
//! Talks to three provider endpoints: `/oauth/token`, `/userinfo` and
//! `/v2/logout`. Every call is a single request, failures are never retried.

use std::time::Duration;

use reqwest::{StatusCode, header::ACCEPT};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use url::Url;

use crate::config::AuthConfig;
use crate::profile::Profile;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("invalid provider url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request to identity provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} answered {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("malformed identity provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("missing authorization code")]
    MissingCode,

    #[error("authorization denied: {error} {description}")]
    Denied { error: String, description: String },

    #[error("identity provider returned a profile without email")]
    MissingEmail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
}

/// Claims of the `/userinfo` response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserInfo {
    #[serde(alias = "user_id")]
    sub: String,
    email: String,
    given_name: String,
    family_name: String,
    picture: String,
}

impl From<UserInfo> for Profile {
    fn from(info: UserInfo) -> Self {
        Profile {
            user_id: info.sub,
            email: info.email,
            given_name: info.given_name,
            family_name: info.family_name,
            picture: info.picture,
        }
    }
}

#[derive(Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    base: Url,
    client_id: String,
    client_secret: String,
    callback_url: String,
    scopes: String,
}

impl OAuthClient {
    pub fn new(config: &AuthConfig) -> Result<Self, OAuthError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("protestpulse/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base: Url::parse(&config.provider_base())?,
            client_id: config.client_id.to_owned(),
            client_secret: config.client_secret.to_owned(),
            callback_url: config.callback_url.to_owned(),
            scopes: config.scopes.to_owned(),
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        let prefix = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{prefix}{path}"));
        url
    }

    /// Where the browser is sent to sign in.
    pub fn authorize_url(&self) -> Url {
        let mut url = self.endpoint("/authorize");
        url.query_pairs_mut().extend_pairs([
            ("response_type", "code"),
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.callback_url.as_str()),
            ("scope", self.scopes.as_str()),
        ]);
        url
    }

    /// Provider logout, which sends the browser back to `return_to` afterwards.
    pub fn logout_url(&self, return_to: &str) -> Url {
        let mut url = self.endpoint("/v2/logout");
        url.query_pairs_mut().extend_pairs([
            ("returnTo", return_to),
            ("client_id", self.client_id.as_str()),
            ("secret", self.client_secret.as_str()),
        ]);
        url
    }

    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, OAuthError> {
        let res = self
            .http
            .post(self.endpoint("/oauth/token"))
            .header(ACCEPT, "application/json")
            .form(&TokenRequest {
                grant_type: "authorization_code",
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                code,
                redirect_uri: &self.callback_url,
            })
            .send()
            .await?;

        read_json("token endpoint", res).await
    }

    pub async fn user_info(&self, access_token: &str) -> Result<Profile, OAuthError> {
        let res = self
            .http
            .get(self.endpoint("/userinfo"))
            .header(ACCEPT, "application/json")
            .bearer_auth(access_token)
            .send()
            .await?;

        let info: UserInfo = read_json("userinfo endpoint", res).await?;

        Ok(info.into())
    }
}

async fn read_json<T: DeserializeOwned>(
    endpoint: &'static str,
    res: reqwest::Response,
) -> Result<T, OAuthError> {
    let status = res.status();
    let body = res.bytes().await?;

    if !status.is_success() {
        return Err(OAuthError::Status {
            endpoint,
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    Ok(serde_json::from_slice(&body)?)
}
