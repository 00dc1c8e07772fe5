use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    db::NewWatchlistEntry,
    error::AppResult,
    models::{AuthUser, MovieId, WatchlistEntry},
    routes::{AppState, JsonBody, PathParam},
};

#[derive(Debug, Serialize)]
pub struct WatchlistStatus {
    pub movie_id: MovieId,
    pub in_watchlist: bool,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<Json<Vec<WatchlistEntry>>> {
    Ok(Json(state.store.get_watchlist(&user.user_id).await?))
}

/// Adds or refreshes a watchlist entry
pub async fn add(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    PathParam(movie_id): PathParam<MovieId>,
    JsonBody(entry): JsonBody<NewWatchlistEntry>,
) -> AppResult<Json<WatchlistEntry>> {
    let entry = state
        .store
        .add_to_watchlist(&user.user_id, movie_id, entry)
        .await?;

    tracing::info!(user_id = %user.user_id, movie_id, "Added to watchlist");

    Ok(Json(entry))
}

pub async fn status(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    PathParam(movie_id): PathParam<MovieId>,
) -> AppResult<Json<WatchlistStatus>> {
    let in_watchlist = state.store.is_in_watchlist(&user.user_id, movie_id).await?;
    Ok(Json(WatchlistStatus {
        movie_id,
        in_watchlist,
    }))
}

/// Removing a movie that is not in the watchlist still succeeds
pub async fn remove(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    PathParam(movie_id): PathParam<MovieId>,
) -> AppResult<StatusCode> {
    let removed = state
        .store
        .remove_from_watchlist(&user.user_id, movie_id)
        .await?;
    tracing::info!(user_id = %user.user_id, movie_id, removed, "Removed from watchlist");
    Ok(StatusCode::NO_CONTENT)
}
