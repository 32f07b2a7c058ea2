use std::env;

use thiserror::Error;

pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_MONGODB_DB: &str = "storefront";
pub const DEFAULT_JWT_EXPIRATION_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not a valid number: {value}")]
    NotANumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    /// When unset the service runs on the in-memory store.
    pub mongodb_uri: Option<String>,
    pub mongodb_db: String,
    pub jwt_secret: String,
    pub jwt_expiration_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| env::var(k).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_expiration_days = match get("JWT_EXPIRATION_DAYS") {
            Some(v) => v.parse().map_err(|_| ConfigError::NotANumber {
                name: "JWT_EXPIRATION_DAYS",
                value: v,
            })?,
            None => DEFAULT_JWT_EXPIRATION_DAYS,
        };

        Ok(Self {
            server_addr: get("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.into()),
            mongodb_uri: get("MONGODB_URI").filter(|s| !s.is_empty()),
            mongodb_db: get("MONGODB_DB").unwrap_or_else(|| DEFAULT_MONGODB_DB.into()),
            jwt_secret: get("JWT_SECRET")
                .filter(|s| !s.is_empty())
                .ok_or(ConfigError::Missing("JWT_SECRET"))?,
            jwt_expiration_days,
        })
    }
}
