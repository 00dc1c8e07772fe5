use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{AuthSession, UserProfile},
    routes::{AppState, JsonBody},
    services::identity::{validate_sign_in, validate_sign_up},
};

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Session tokens together with the caller's stored profile
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub session: AuthSession,
    pub profile: UserProfile,
}

/// Creates an account and its profile document
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<SignUpRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let input = validate_sign_up(&request.email, &request.password, &request.name)?;

    let session = state
        .identity
        .sign_up(&input.email, &input.password, &input.name)
        .await?;

    let profile = UserProfile {
        user_id: session.user.user_id.clone(),
        name: input.name,
        email: session.user.email.clone().or(Some(input.email)),
        profile_picture: String::new(),
    };
    state.store.put_profile(profile.clone()).await?;

    tracing::info!(user_id = %profile.user_id, "User signed up");

    Ok((StatusCode::CREATED, Json(AuthResponse { session, profile })))
}

/// Signs in and makes sure a profile document exists
pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = validate_sign_in(&request.email, &request.password)?;

    let session = state.identity.sign_in(&email, &request.password).await?;

    let profile = state
        .store
        .create_profile_if_absent(UserProfile::for_new_account(&session.user))
        .await?;

    Ok(Json(AuthResponse { session, profile }))
}
