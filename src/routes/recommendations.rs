use axum::{
    extract::State,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{AuthUser, MovieId, RecommendedMovie},
    routes::{AppState, QueryParams},
    services::recommendations::{self, MAX_RECOMMENDATION_LIMIT},
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
}

/// Handler for the caller's genre-based recommendations
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    QueryParams(query): QueryParams<RecommendationQuery>,
) -> AppResult<Json<Vec<RecommendedMovie>>> {
    let limit = query.limit.unwrap_or(state.recommendation_limit);
    if !(1..=MAX_RECOMMENDATION_LIMIT).contains(&limit) {
        return Err(AppError::InvalidInput(format!(
            "Limit must be between 1 and {}",
            MAX_RECOMMENDATION_LIMIT
        )));
    }

    let watchlist: Vec<MovieId> = state
        .store
        .get_watchlist(&user.user_id)
        .await?
        .into_iter()
        .map(|entry| entry.movie_id)
        .collect();
    let ratings = state.store.get_ratings(&user.user_id).await?;

    tracing::info!(
        user_id = %user.user_id,
        watchlist_count = watchlist.len(),
        rating_count = ratings.len(),
        limit,
        "Generating recommendations"
    );

    let recommendations = recommendations::generate_recommendations(
        state.catalog.as_ref(),
        &watchlist,
        &ratings,
        limit,
    )
    .await?;

    Ok(Json(recommendations))
}
