use std::env;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} is not a valid number: {1}")]
    InvalidNumber(&'static str, String),
}

/// Accepted token lifetimes, in days.
const TOKEN_TTL_RANGE: std::ops::RangeInclusive<i64> = 1..=365;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub token_secret: String,
    pub token_ttl_days: i64,
    /// Empty means any origin is allowed.
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidNumber("PORT", raw))?,
            None => 5000,
        };

        let url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => {
                let user = lookup("DB_USER").ok_or(ConfigError::Missing("DATABASE_URL or DB_USER"))?;
                let password = lookup("DB_PASSWORD").ok_or(ConfigError::Missing("DB_PASSWORD"))?;
                let db_host = lookup("DB_HOST").ok_or(ConfigError::Missing("DB_HOST"))?;
                format!(
                    "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
                    user, password, db_host
                )
            }
        };
        let name = lookup("DATABASE_NAME").unwrap_or_else(|| "dbBuyTop".to_string());

        let token_secret = lookup("ACCESS_TOKEN").ok_or(ConfigError::Missing("ACCESS_TOKEN"))?;
        let token_ttl_days = match lookup("TOKEN_TTL_DAYS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(days) if TOKEN_TTL_RANGE.contains(&days) => days,
                _ => return Err(ConfigError::InvalidNumber("TOKEN_TTL_DAYS", raw)),
            },
            None => 7,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            database: DatabaseConfig { url, name },
            token_secret,
            token_ttl_days,
            cors_origins,
        })
    }
}
