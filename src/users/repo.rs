use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::error::StoreError;
use super::repo_types::{NewUser, User, UserSummary};

/// Persistence for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `Duplicate` if the id is taken; never overwrites.
    async fn create(&self, new: &NewUser) -> Result<User, StoreError>;

    /// Users whose id starts with `term`, ordered by id.
    async fn search_by_partial_id(&self, term: &str) -> Result<Vec<UserSummary>, StoreError>;

    /// Fetch one user by id.
    async fn get_by_id(&self, user_id: &str) -> Result<User, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
    search_limit: i64,
}

impl PgUserStore {
    pub fn new(db: PgPool, search_limit: i64) -> Self {
        Self { db, search_limit }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, new: &NewUser) -> Result<User, StoreError> {
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, user_name, phone_number, profile_picture, fcm_token)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING user_id, user_name, phone_number, profile_picture, created_at, fcm_token
            "#,
        )
        .bind(&new.user_id)
        .bind(&new.username)
        .bind(&new.phone_number)
        .bind(&new.profile_picture)
        .bind(&new.fcm_token)
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::Duplicate(new.user_id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn search_by_partial_id(&self, term: &str) -> Result<Vec<UserSummary>, StoreError> {
        let pattern = format!("{}%", escape_like(term));
        let rows = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT user_id, user_name, profile_picture
            FROM users
            WHERE user_id LIKE $1 ESCAPE '\'
            ORDER BY user_id
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(self.search_limit)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, user_id: &str) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, user_name, phone_number, profile_picture, created_at, fcm_token
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        debug!(?user, "fetched user");
        user.ok_or_else(|| StoreError::NotFound(user_id.to_owned()))
    }
}

/// Escapes LIKE metacharacters so the term matches literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
