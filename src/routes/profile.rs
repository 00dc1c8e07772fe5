use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{AuthUser, ProfileUpdate, UserProfile},
    routes::{AppState, JsonBody},
};

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<Json<UserProfile>> {
    let profile = match state.store.get_profile(&user.user_id).await? {
        Some(profile) => profile,
        // Accounts created outside this API have no document yet
        None => {
            state
                .store
                .create_profile_if_absent(UserProfile::for_new_account(&user))
                .await?
        }
    };
    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    JsonBody(update): JsonBody<ProfileUpdate>,
) -> AppResult<Json<UserProfile>> {
    let update = update.validate()?;

    state
        .store
        .create_profile_if_absent(UserProfile::for_new_account(&user))
        .await?;
    let profile = state.store.update_profile(&user.user_id, update).await?;

    tracing::info!(user_id = %user.user_id, "Profile updated");

    Ok(Json(profile))
}
