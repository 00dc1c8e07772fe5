//! Per-user documents: profiles, watchlists, ratings and favorite actors.
//!
//! Every write replaces the stored document for its key; reads return the
//! result of the last write.
use std::collections::HashMap;

use crate::{
    error::AppResult,
    models::{
        FavoriteActor, MovieId, MovieRating, PersonId, ProfileUpdate, UserProfile, WatchlistEntry,
    },
};

/// Watchlist entry as submitted by a client; the store stamps `added_at`
#[derive(Debug, Clone, serde::Deserialize, PartialEq)]
pub struct NewWatchlistEntry {
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

/// Favorite actor as submitted by a client
#[derive(Debug, Clone, serde::Deserialize, PartialEq)]
pub struct NewFavoriteActor {
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>>;

    /// Writes `profile` unless one already exists; returns the stored profile
    async fn create_profile_if_absent(&self, profile: UserProfile) -> AppResult<UserProfile>;

    /// Overwrites `profile` unconditionally
    async fn put_profile(&self, profile: UserProfile) -> AppResult<()>;

    /// Applies a partial update; `NotFound` if the user has no profile
    async fn update_profile(&self, user_id: &str, update: ProfileUpdate)
        -> AppResult<UserProfile>;

    /// Upserts by (user, movie)
    async fn add_to_watchlist(
        &self,
        user_id: &str,
        movie_id: MovieId,
        entry: NewWatchlistEntry,
    ) -> AppResult<WatchlistEntry>;

    /// Returns whether an entry was removed
    async fn remove_from_watchlist(&self, user_id: &str, movie_id: MovieId) -> AppResult<bool>;

    async fn is_in_watchlist(&self, user_id: &str, movie_id: MovieId) -> AppResult<bool>;

    /// Newest first
    async fn get_watchlist(&self, user_id: &str) -> AppResult<Vec<WatchlistEntry>>;

    /// Rating must already be validated to 1..=10
    async fn set_rating(&self, user_id: &str, movie_id: MovieId, rating: u8)
        -> AppResult<MovieRating>;

    async fn get_rating(&self, user_id: &str, movie_id: MovieId) -> AppResult<Option<MovieRating>>;

    async fn get_ratings(&self, user_id: &str) -> AppResult<HashMap<MovieId, u8>>;

    async fn delete_rating(&self, user_id: &str, movie_id: MovieId) -> AppResult<bool>;

    async fn add_favorite_actor(
        &self,
        user_id: &str,
        person_id: PersonId,
        actor: NewFavoriteActor,
    ) -> AppResult<FavoriteActor>;

    async fn remove_favorite_actor(&self, user_id: &str, person_id: PersonId) -> AppResult<bool>;

    async fn is_favorite_actor(&self, user_id: &str, person_id: PersonId) -> AppResult<bool>;

    /// Newest first
    async fn get_favorite_actors(&self, user_id: &str) -> AppResult<Vec<FavoriteActor>>;
}
