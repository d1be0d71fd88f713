use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail};
use tracing::info;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

/// One year.
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub store_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("FORUM_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("FORUM_JWT_SECRET is unset or still a placeholder. Set it in your .env file and restart.");
        }

        let token_ttl_hours: i64 = load(&lookup, "FORUM_TOKEN_TTL_HOURS", 24)?;
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&token_ttl_hours) {
            bail!(
                "FORUM_TOKEN_TTL_HOURS must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_HOURS,
                token_ttl_hours
            );
        }
        let store_timeout_ms: u64 = load(&lookup, "FORUM_STORE_TIMEOUT_MS", 5000)?;
        if store_timeout_ms == 0 {
            bail!("FORUM_STORE_TIMEOUT_MS must be greater than 0");
        }

        Ok(Self {
            host: lookup("FORUM_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: load(&lookup, "FORUM_PORT", 3000)?,
            db_path: lookup("FORUM_DB_PATH").unwrap_or_else(|| "forum.db".into()).into(),
            jwt_secret,
            token_ttl: chrono::Duration::hours(token_ttl_hours),
            store_timeout: Duration::from_millis(store_timeout_ms),
        })
    }
}

fn load<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow!("Invalid {} value '{}': {}", key, raw, e)),
        None => {
            info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}
