use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::{collections::HashMap, sync::Arc};

use crate::{
    error::{AppError, AppResult},
    models::{user::validate_rating, AuthUser, MovieId, MovieRating},
    routes::{AppState, JsonBody, PathParam},
};

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: i64,
}

/// All of the caller's ratings keyed by movie id
pub async fn list(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<Json<HashMap<MovieId, u8>>> {
    Ok(Json(state.store.get_ratings(&user.user_id).await?))
}

/// Sets or replaces the caller's rating; out-of-range ratings store nothing
pub async fn rate(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    PathParam(movie_id): PathParam<MovieId>,
    JsonBody(request): JsonBody<RatingRequest>,
) -> AppResult<Json<MovieRating>> {
    let rating = validate_rating(request.rating)?;

    let stored = state
        .store
        .set_rating(&user.user_id, movie_id, rating)
        .await?;

    tracing::info!(user_id = %user.user_id, movie_id, rating, "Movie rated");

    Ok(Json(stored))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    PathParam(movie_id): PathParam<MovieId>,
) -> AppResult<Json<MovieRating>> {
    let rating = state
        .store
        .get_rating(&user.user_id, movie_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No rating for movie {}", movie_id)))?;

    Ok(Json(rating))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    PathParam(movie_id): PathParam<MovieId>,
) -> AppResult<StatusCode> {
    state.store.delete_rating(&user.user_id, movie_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
