use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use super::store::{NewFavoriteActor, NewWatchlistEntry, UserStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        FavoriteActor, MovieId, MovieRating, PersonId, ProfileUpdate, UserProfile,
        WatchlistEntry,
    },
};

/// Documents belonging to one user
#[derive(Default)]
struct UserDocuments {
    profile: Option<UserProfile>,
    /// Oldest first; re-adding moves an entry to the end
    watchlist: Vec<WatchlistEntry>,
    ratings: HashMap<MovieId, MovieRating>,
    favorite_actors: Vec<FavoriteActor>,
}

/// Process-local [`UserStore`] used when no database is configured
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, UserDocuments>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn get_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        let users = self.users.read().await;
        Ok(users.get(user_id).and_then(|docs| docs.profile.clone()))
    }

    async fn create_profile_if_absent(&self, profile: UserProfile) -> AppResult<UserProfile> {
        let mut users = self.users.write().await;
        let docs = users.entry(profile.user_id.clone()).or_default();
        Ok(docs.profile.get_or_insert(profile).clone())
    }

    async fn put_profile(&self, profile: UserProfile) -> AppResult<()> {
        let user_id = profile.user_id.clone();
        let mut users = self.users.write().await;
        users.entry(user_id).or_default().profile = Some(profile);
        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> AppResult<UserProfile> {
        let mut users = self.users.write().await;
        let profile = users
            .get_mut(user_id)
            .and_then(|docs| docs.profile.as_mut())
            .ok_or_else(|| AppError::NotFound(format!("Profile for user {}", user_id)))?;

        if let Some(name) = update.name {
            profile.name = name;
        }
        if let Some(picture) = update.profile_picture {
            profile.profile_picture = picture;
        }
        Ok(profile.clone())
    }

    async fn add_to_watchlist(
        &self,
        user_id: &str,
        movie_id: MovieId,
        entry: NewWatchlistEntry,
    ) -> AppResult<WatchlistEntry> {
        let stored = WatchlistEntry {
            movie_id,
            title: entry.title,
            poster_path: entry.poster_path,
            release_date: entry.release_date,
            vote_average: entry.vote_average,
            added_at: Utc::now(),
        };

        let mut users = self.users.write().await;
        let docs = users.entry(user_id.to_string()).or_default();
        docs.watchlist.retain(|e| e.movie_id != movie_id);
        docs.watchlist.push(stored.clone());
        Ok(stored)
    }

    async fn remove_from_watchlist(&self, user_id: &str, movie_id: MovieId) -> AppResult<bool> {
        let mut users = self.users.write().await;
        let Some(docs) = users.get_mut(user_id) else {
            return Ok(false);
        };
        let before = docs.watchlist.len();
        docs.watchlist.retain(|e| e.movie_id != movie_id);
        Ok(docs.watchlist.len() != before)
    }

    async fn is_in_watchlist(&self, user_id: &str, movie_id: MovieId) -> AppResult<bool> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .is_some_and(|docs| docs.watchlist.iter().any(|e| e.movie_id == movie_id)))
    }

    async fn get_watchlist(&self, user_id: &str) -> AppResult<Vec<WatchlistEntry>> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .map(|docs| docs.watchlist.iter().rev().cloned().collect())
            .unwrap_or_default())
    }

    async fn set_rating(
        &self,
        user_id: &str,
        movie_id: MovieId,
        rating: u8,
    ) -> AppResult<MovieRating> {
        let stored = MovieRating {
            movie_id,
            rating,
            rated_at: Utc::now(),
        };
        let mut users = self.users.write().await;
        users
            .entry(user_id.to_string())
            .or_default()
            .ratings
            .insert(movie_id, stored.clone());
        Ok(stored)
    }

    async fn get_rating(
        &self,
        user_id: &str,
        movie_id: MovieId,
    ) -> AppResult<Option<MovieRating>> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .and_then(|docs| docs.ratings.get(&movie_id))
            .cloned())
    }

    async fn get_ratings(&self, user_id: &str) -> AppResult<HashMap<MovieId, u8>> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .map(|docs| {
                docs.ratings
                    .values()
                    .map(|r| (r.movie_id, r.rating))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete_rating(&self, user_id: &str, movie_id: MovieId) -> AppResult<bool> {
        let mut users = self.users.write().await;
        Ok(users
            .get_mut(user_id)
            .is_some_and(|docs| docs.ratings.remove(&movie_id).is_some()))
    }

    async fn add_favorite_actor(
        &self,
        user_id: &str,
        person_id: PersonId,
        actor: NewFavoriteActor,
    ) -> AppResult<FavoriteActor> {
        let stored = FavoriteActor {
            person_id,
            name: actor.name,
            profile_path: actor.profile_path,
            added_at: Utc::now(),
        };

        let mut users = self.users.write().await;
        let docs = users.entry(user_id.to_string()).or_default();
        docs.favorite_actors.retain(|a| a.person_id != person_id);
        docs.favorite_actors.push(stored.clone());
        Ok(stored)
    }

    async fn remove_favorite_actor(&self, user_id: &str, person_id: PersonId) -> AppResult<bool> {
        let mut users = self.users.write().await;
        let Some(docs) = users.get_mut(user_id) else {
            return Ok(false);
        };
        let before = docs.favorite_actors.len();
        docs.favorite_actors.retain(|a| a.person_id != person_id);
        Ok(docs.favorite_actors.len() != before)
    }

    async fn is_favorite_actor(&self, user_id: &str, person_id: PersonId) -> AppResult<bool> {
        let users = self.users.read().await;
        Ok(users.get(user_id).is_some_and(|docs| {
            docs.favorite_actors
                .iter()
                .any(|a| a.person_id == person_id)
        }))
    }

    async fn get_favorite_actors(&self, user_id: &str) -> AppResult<Vec<FavoriteActor>> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .map(|docs| docs.favorite_actors.iter().rev().cloned().collect())
            .unwrap_or_default())
    }
}
