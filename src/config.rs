use std::env;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("SERVER_PORT must be a number, got {0:?}")]
    InvalidPort(String),
}

/// Process configuration, read once at startup.
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    /// HMAC key for session tokens. Never logged.
    pub jwt_secret: String,
    /// Browser origin allowed to send the session cookie cross-site.
    pub allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_port = env::var("SERVER_PORT").unwrap_or_else(|_| "8080".to_string());

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            server_port: server_port
                .parse()
                .map_err(|_| ConfigError::InvalidPort(server_port.clone()))?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret: required("JWT_SECRET")?,
            allowed_origin: env::var("ALLOWED_ORIGIN").ok().filter(|o| !o.is_empty()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("server_port", &self.server_port)
            .field("server_host", &self.server_host)
            .field("jwt_secret", &"<redacted>")
            .field("allowed_origin", &self.allowed_origin)
            .finish()
    }
}
