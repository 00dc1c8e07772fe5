use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MovieId, PersonId};
use crate::error::{AppError, AppResult};

/// Lowest and highest score a user can give a movie
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

/// Name stored for accounts whose identity record carries no display name
pub const DEFAULT_DISPLAY_NAME: &str = "No Name";

/// Identity of the caller, resolved from a bearer token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub user_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Tokens issued by the identity service after sign-up or sign-in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    pub id_token: String,
    pub refresh_token: String,
    /// Seconds until `id_token` expires
    pub expires_in: u64,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub profile_picture: String,
}

impl UserProfile {
    /// Profile written the first time an account is seen
    pub fn for_new_account(user: &AuthUser) -> Self {
        Self {
            user_id: user.user_id.clone(),
            name: user
                .display_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            email: user.email.clone(),
            profile_picture: String::new(),
        }
    }
}

/// Partial profile edit; absent fields are left alone
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub profile_picture: Option<String>,
}

impl ProfileUpdate {
    /// Rejects empty edits and returns the update with the name trimmed
    pub fn validate(self) -> AppResult<Self> {
        if self.name.is_none() && self.profile_picture.is_none() {
            return Err(AppError::InvalidInput(
                "Provide a name or a profile picture to update".to_string(),
            ));
        }
        let name = match self.name {
            Some(name) => {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(AppError::InvalidInput("Name cannot be empty".to_string()));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };
        Ok(Self {
            name,
            profile_picture: self.profile_picture,
        })
    }
}

/// A movie saved to a user's watchlist, with enough data to render it offline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    pub movie_id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRating {
    pub movie_id: MovieId,
    pub rating: u8,
    pub rated_at: DateTime<Utc>,
}

/// Checks a rating is on the 1..=10 scale
pub fn validate_rating(rating: i64) -> AppResult<u8> {
    if (MIN_RATING as i64..=MAX_RATING as i64).contains(&rating) {
        Ok(rating as u8)
    } else {
        Err(AppError::InvalidInput(format!(
            "Rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, rating
        )))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteActor {
    pub person_id: PersonId,
    pub name: String,
    pub profile_path: Option<String>,
    pub added_at: DateTime<Utc>,
}
