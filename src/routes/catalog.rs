use axum::{
    extract::State,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        Genre, MovieDetails, MovieId, MovieSummary, Page, PersonDetails, PersonId, TvShowDetails,
        TvSummary,
    },
    routes::{AppState, PageQuery, PathParam, QueryParams},
    services::catalog::attach_cast_biographies,
};

const DEFAULT_TOP_RATED_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct TopRatedQuery {
    pub page: Option<u32>,
    pub limit: Option<usize>,
}

pub async fn trending(State(state): State<Arc<AppState>>) -> AppResult<Json<Page<MovieSummary>>> {
    Ok(Json(state.catalog.trending_movies().await?))
}

pub async fn upcoming(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<Page<MovieSummary>>> {
    Ok(Json(state.catalog.upcoming_movies(query.page()).await?))
}

/// Top rated movies, cut to `limit` (10 unless given)
pub async fn top_rated(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<TopRatedQuery>,
) -> AppResult<Json<Page<MovieSummary>>> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_RATED_LIMIT);
    if limit == 0 {
        return Err(AppError::InvalidInput("Limit must be at least 1".to_string()));
    }

    let mut page = state
        .catalog
        .top_rated_movies(query.page.unwrap_or(1).max(1))
        .await?;
    page.results.truncate(limit);
    Ok(Json(page))
}

pub async fn popular(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<Page<MovieSummary>>> {
    Ok(Json(state.catalog.popular_movies(query.page()).await?))
}

pub async fn tv_on_the_air(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<PageQuery>,
) -> AppResult<Json<Page<TvSummary>>> {
    Ok(Json(state.catalog.tv_on_the_air(query.page()).await?))
}

pub async fn genres(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(state.catalog.movie_genres().await?))
}

pub async fn movie(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<MovieId>,
) -> AppResult<Json<MovieDetails>> {
    let mut details = state.catalog.movie_details(id).await?;
    attach_cast_biographies(state.catalog.as_ref(), &mut details.cast).await;
    Ok(Json(details))
}

pub async fn tv_show(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<u64>,
) -> AppResult<Json<TvShowDetails>> {
    Ok(Json(state.catalog.tv_details(id).await?))
}

pub async fn person(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<PersonId>,
) -> AppResult<Json<PersonDetails>> {
    Ok(Json(state.catalog.person_details(id).await?))
}
