use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    #[serde(rename = "userName")]
    #[sqlx(rename = "user_name")]
    pub username: String,
    pub phone_number: String,
    pub profile_picture: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub fcm_token: Option<String>, // push delivery token
}

/// Fields a client may supply when registering. `created_at` is stamped by the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub user_id: String,
    #[serde(default, rename = "userName", deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone_number: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub fcm_token: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// Discovery projection of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: String,
    #[serde(rename = "userName")]
    #[sqlx(rename = "user_name")]
    pub username: String,
    pub profile_picture: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        Self {
            user_id: u.user_id.clone(),
            username: u.username.clone(),
            profile_picture: u.profile_picture.clone(),
        }
    }
}
