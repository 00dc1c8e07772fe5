use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    db::NewFavoriteActor,
    error::AppResult,
    models::{AuthUser, FavoriteActor, PersonId},
    routes::{AppState, JsonBody, PathParam},
};

#[derive(Debug, Serialize)]
pub struct FavoriteStatus {
    pub person_id: PersonId,
    pub is_favorite: bool,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<Json<Vec<FavoriteActor>>> {
    Ok(Json(state.store.get_favorite_actors(&user.user_id).await?))
}

pub async fn add(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    PathParam(person_id): PathParam<PersonId>,
    JsonBody(actor): JsonBody<NewFavoriteActor>,
) -> AppResult<Json<FavoriteActor>> {
    let favorite = state
        .store
        .add_favorite_actor(&user.user_id, person_id, actor)
        .await?;

    tracing::info!(user_id = %user.user_id, person_id, "Favorite actor added");

    Ok(Json(favorite))
}

pub async fn status(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    PathParam(person_id): PathParam<PersonId>,
) -> AppResult<Json<FavoriteStatus>> {
    let is_favorite = state
        .store
        .is_favorite_actor(&user.user_id, person_id)
        .await?;
    Ok(Json(FavoriteStatus {
        person_id,
        is_favorite,
    }))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    PathParam(person_id): PathParam<PersonId>,
) -> AppResult<StatusCode> {
    state
        .store
        .remove_favorite_actor(&user.user_id, person_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
