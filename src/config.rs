use anyhow::Context;
use serde::Deserialize;

/// Longest token lifetime accepted from the environment (one year).
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    /// Upper bound on rows returned by user discovery, at least 1.
    pub discovery_limit: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let max_connections = env_or("DB_MAX_CONNECTIONS", 10);
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "lexichat".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "lexichat-users".into()),
            ttl_minutes: env_or::<i64>("JWT_TTL_MINUTES", 60 * 24).clamp(1, MAX_TTL_MINUTES),
        };
        let discovery_limit = env_or::<u32>("DISCOVERY_LIMIT", 50).max(1);
        Ok(Self {
            database_url,
            max_connections,
            jwt,
            discovery_limit,
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
