use axum::{
    extract::State,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{MultiSearchResult, PersonSummary, SearchResults},
    routes::{AppState, QueryParams},
    services::search::{people_suggestions, quick_search, run_search, SearchFilters},
};

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MultiSearchQuery {
    #[serde(default)]
    pub query: String,
    pub page: Option<u32>,
}

/// Handler for combined movie and people search
pub async fn search(
    State(state): State<Arc<AppState>>,
    QueryParams(filters): QueryParams<SearchFilters>,
) -> AppResult<Json<SearchResults>> {
    let results = run_search(state.catalog.as_ref(), &filters).await?;
    Ok(Json(results))
}

/// Actor name autocompletion
pub async fn suggest_people(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<SuggestQuery>,
) -> AppResult<Json<Vec<PersonSummary>>> {
    let people = people_suggestions(state.catalog.as_ref(), &query.name).await?;
    Ok(Json(people))
}

/// Quick search over movies, TV shows and people, each tagged with `media_type`
pub async fn multi(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<MultiSearchQuery>,
) -> AppResult<Json<Vec<MultiSearchResult>>> {
    let results = quick_search(
        state.catalog.as_ref(),
        &query.query,
        query.page.unwrap_or(1),
    )
    .await?;
    Ok(Json(results))
}
