use axum::{
    http::{HeaderValue, StatusCode},
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod auth;
pub mod catalog;
pub mod extract;
pub mod favorites;
pub mod profile;
pub mod ratings;
pub mod recommendations;
pub mod search;
pub mod state;
pub mod watchlist;

pub use extract::{JsonBody, PathParam, QueryParams};
pub use state::AppState;

/// `?page=` on paginated listings
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// CORS for the browser client; any origin when none is configured
pub fn cors_layer(allowed_origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let origin = match allowed_origin {
        Some(origin) => AllowOrigin::exact(HeaderValue::from_str(origin)?),
        None => AllowOrigin::from(Any),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(cors),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies/trending", get(catalog::trending))
        .route("/movies/upcoming", get(catalog::upcoming))
        .route("/movies/top-rated", get(catalog::top_rated))
        .route("/movies/popular", get(catalog::popular))
        .route("/movies/:id", get(catalog::movie))
        .route("/tv/on-the-air", get(catalog::tv_on_the_air))
        .route("/tv/:id", get(catalog::tv_show))
        .route("/genres", get(catalog::genres))
        .route("/people/suggest", get(search::suggest_people))
        .route("/people/:id", get(catalog::person))
        .route("/search", get(search::search))
        .route("/search/multi", get(search::multi))
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/login", post(auth::login))
        .route("/me", get(profile::get_profile).patch(profile::update_profile))
        .route("/me/watchlist", get(watchlist::list))
        .route(
            "/me/watchlist/:movie_id",
            put(watchlist::add).get(watchlist::status).delete(watchlist::remove),
        )
        .route("/me/ratings", get(ratings::list))
        .route(
            "/me/ratings/:movie_id",
            put(ratings::rate).get(ratings::get).delete(ratings::remove),
        )
        .route("/me/favorites/actors", get(favorites::list))
        .route(
            "/me/favorites/actors/:person_id",
            put(favorites::add).get(favorites::status).delete(favorites::remove),
        )
        .route("/me/recommendations", get(recommendations::recommend))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
