use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;

use crate::auth::{JwtKeys, TokenIssuer};
use crate::config::AppConfig;
use crate::users::repo::{PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tokens: Arc<dyn TokenIssuer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        let users = Arc::new(PgUserStore::new(db, i64::from(config.discovery_limit))) as Arc<dyn UserStore>;
        let tokens = Arc::new(JwtKeys::from_config(&config.jwt)) as Arc<dyn TokenIssuer>;

        Ok(Self::from_parts(users, tokens))
    }

    pub fn from_parts(users: Arc<dyn UserStore>, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self { users, tokens }
    }

    /// State backed by the given in-memory store and test JWT keys.
    #[cfg(test)]
    pub fn fake(users: Arc<crate::users::memory::MemoryUserStore>) -> Self {
        let jwt = crate::config::JwtConfig {
            secret: "test".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
        };
        let tokens = Arc::new(JwtKeys::from_config(&jwt)) as Arc<dyn TokenIssuer>;
        Self::from_parts(users, tokens)
    }
}

impl FromRef<AppState> for Arc<dyn TokenIssuer> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
