use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::AuthUser,
    state::AppState,
    users::{
        dto::{CreatedUserResponse, DiscoverParams},
        error::StoreError,
        repo_types::{NewUser, User, UserSummary},
    },
};

/// Discovery terms must be strictly longer than this many characters.
pub const MIN_PARTIAL_ID_EXCLUSIVE: usize = 3;

/// `/users/:user_id` has no fixed siblings, so every stored id stays reachable.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(discover_users))
        .route("/users/:user_id", get(get_user))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), (StatusCode, String)> {
    let Json(new_user) = payload.map_err(|e| {
        warn!(error = %e, "invalid user payload");
        (StatusCode::BAD_REQUEST, "Invalid JSON".to_string())
    })?;

    if new_user.user_id.trim().is_empty() {
        warn!("blank userId");
        return Err((StatusCode::BAD_REQUEST, "userId is required".into()));
    }

    let user = match state.users.create(&new_user).await {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, user_id = %new_user.user_id, "create user failed");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create user".into(),
            ));
        }
    };

    // The row stays even if signing fails; issuing is stateless and can be repeated.
    let token = match state.tokens.issue(&user.user_id) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, user_id = %user.user_id, "token issuance failed");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate JWT token".into(),
            ));
        }
    };

    info!(user_id = %user.user_id, "user created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            user_id: user.user_id,
            token,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn discover_users(
    State(state): State<AppState>,
    Query(params): Query<DiscoverParams>,
) -> Result<Json<Vec<UserSummary>>, (StatusCode, String)> {
    let term = params.partial_user_id;
    if term.chars().count() <= MIN_PARTIAL_ID_EXCLUSIVE {
        warn!(%term, "partialUserId too short");
        return Err((
            StatusCode::BAD_REQUEST,
            format!("partialUserId must be longer than {MIN_PARTIAL_ID_EXCLUSIVE} characters"),
        ));
    }

    let users = state.users.search_by_partial_id(&term).await.map_err(|e| {
        error!(error = %e, %term, "discover users failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Problem arose while discovering users: {e}"),
        )
    })?;

    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, (StatusCode, String)> {
    fetch_user(&state, &user_id).await.map(Json)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<User>, (StatusCode, String)> {
    fetch_user(&state, &user_id).await.map(Json)
}

async fn fetch_user(state: &AppState, user_id: &str) -> Result<User, (StatusCode, String)> {
    state.users.get_by_id(user_id).await.map_err(|e| {
        let status = match &e {
            StoreError::NotFound(_) => {
                warn!(%user_id, "user not found");
                StatusCode::NOT_FOUND
            }
            _ => {
                error!(error = %e, %user_id, "fetch user failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, format!("Problem fetching user details: {e}"))
    })
}
