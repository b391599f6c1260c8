use serde::{Deserialize, Serialize};

/// Body returned after a user is created.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUserResponse {
    pub user_id: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverParams {
    #[serde(default, rename = "partialUserId")]
    pub partial_user_id: String,
}
