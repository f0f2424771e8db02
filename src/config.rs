use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public URL of this application, used to build the post-logout return address.
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Identity provider client parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub domain: String,
    pub callback_url: String,
    /// Overrides `https://{domain}` as the provider base URL.
    #[serde(default)]
    pub provider_url: Option<String>,
    pub scopes: String,
    pub timeout_secs: u64,
}

impl AuthConfig {
    pub fn provider_base(&self) -> String {
        match &self.provider_url {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_owned(),
            _ => format!("https://{}", self.domain),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub cookie_key: String,
    pub secure: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy variables (AUTH0_CLIENT_ID, COOKIE_KEY, DATABASE_URL, PORT, ...)
    /// 2. Environment variables (PROTESTPULSE__DATABASE__URL, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.base_url", "http://localhost:3000")?
            .set_default("database.url", "sqlite:protestpulse.db")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.client_id", "")?
            .set_default("auth.client_secret", "")?
            .set_default("auth.domain", "")?
            .set_default("auth.callback_url", "http://localhost:3000/auth/callback")?
            .set_default("auth.scopes", "openid profile email")?
            .set_default("auth.timeout_secs", 30)?
            .set_default("session.cookie_key", "")?
            .set_default("session.secure", false)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("PROTESTPULSE")
                .separator("__")
                .try_parsing(true),
        );

        for (var, key) in [
            ("AUTH0_CLIENT_ID", "auth.client_id"),
            ("AUTH0_CLIENT_SECRET", "auth.client_secret"),
            ("AUTH0_DOMAIN", "auth.domain"),
            ("AUTH0_CALLBACK_URL", "auth.callback_url"),
            ("COOKIE_KEY", "session.cookie_key"),
            ("DATABASE_URL", "database.url"),
        ] {
            if let Ok(value) = env::var(var) {
                builder = builder.set_override(key, value)?;
            }
        }

        if let Ok(port) = env::var("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|e| ConfigError::Message(format!("invalid PORT: {e}")))?;
            builder = builder.set_override("server.port", i64::from(port))?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.session.cookie_key.len() < 32 {
            return Err("Session cookie key must be at least 32 characters long".to_string());
        }

        if self.auth.client_id.is_empty() {
            return Err("Identity provider client id must be set".to_string());
        }

        let provider_url = self.auth.provider_url.as_deref().map(str::trim);
        if self.auth.domain.is_empty() && provider_url.is_none_or(str::is_empty) {
            return Err("Identity provider domain must be set".to_string());
        }

        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }

        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        Ok(())
    }
}
