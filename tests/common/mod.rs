//! In-process stand-ins for TMDB and the identity service
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
    sync::{Arc, Mutex},
};

use axum_test::TestServer;
use reelscout_api::{
    db::MemoryUserStore,
    error::{AppError, AppResult},
    models::{
        tmdb::TmdbMovieDetails, AuthSession, AuthUser, Genre, ImageBase, MovieDetails, MovieId,
        MovieSummary, MultiSearchResult, Page, PersonDetails, PersonId, PersonSummary,
        TvShowDetails, TvSummary,
    },
    routes::{cors_layer, create_router, AppState},
    services::{
        catalog::{DiscoverParams, GenreMatch},
        IdentityProvider, MovieCatalog,
    },
};
use serde_json::json;

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

fn movie(id: MovieId, title: &str, genre_ids: &[u64], popularity: f64) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        overview: None,
        poster_url: None,
        backdrop_url: None,
        release_date: None,
        release_year: None,
        vote_average: 7.0,
        genre_ids: genre_ids.to_vec(),
        popularity,
    }
}

fn page<T>(results: Vec<T>) -> Page<T> {
    Page {
        page: 1,
        total_pages: 1,
        total_results: results.len() as u32,
        results,
    }
}

/// Small fixed catalog ordered by popularity
pub struct FakeCatalog {
    movies: Vec<MovieSummary>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self {
            movies: vec![
                movie(603, "The Matrix", &[28, 878], 90.0),
                movie(27205, "Inception", &[28, 878, 12], 85.0),
                movie(604, "The Matrix Reloaded", &[28, 878], 80.0),
                movie(680, "Pulp Fiction", &[53, 80], 75.0),
                movie(13, "Forrest Gump", &[35, 18], 70.0),
                movie(550, "Fight Club", &[18], 60.0),
            ],
        }
    }
}

#[async_trait::async_trait]
impl MovieCatalog for FakeCatalog {
    async fn trending_movies(&self) -> AppResult<Page<MovieSummary>> {
        Ok(page(self.movies.clone()))
    }

    async fn upcoming_movies(&self, _page: u32) -> AppResult<Page<MovieSummary>> {
        Ok(page(self.movies.clone()))
    }

    async fn top_rated_movies(&self, _page: u32) -> AppResult<Page<MovieSummary>> {
        Ok(page(self.movies.clone()))
    }

    async fn popular_movies(&self, _page: u32) -> AppResult<Page<MovieSummary>> {
        Ok(page(self.movies.clone()))
    }

    async fn tv_on_the_air(&self, _page: u32) -> AppResult<Page<TvSummary>> {
        Ok(page(vec![TvSummary {
            id: 1399,
            name: "Game of Thrones".to_string(),
            overview: None,
            poster_url: None,
            first_air_date: Some("2011-04-17".to_string()),
            vote_average: 8.4,
        }]))
    }

    async fn movie_genres(&self) -> AppResult<Vec<Genre>> {
        Ok(vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 18,
                name: "Drama".to_string(),
            },
        ])
    }

    async fn search_movies(
        &self,
        query: &str,
        _year: Option<i32>,
        _page: u32,
    ) -> AppResult<Page<MovieSummary>> {
        let query = query.to_lowercase();
        Ok(page(
            self.movies
                .iter()
                .filter(|m| m.title.to_lowercase().contains(&query))
                .cloned()
                .collect(),
        ))
    }

    async fn discover_movies(&self, params: &DiscoverParams) -> AppResult<Page<MovieSummary>> {
        let matches = |m: &MovieSummary| match params.genre_match {
            _ if params.genres.is_empty() => true,
            GenreMatch::All => params.genres.iter().all(|g| m.genre_ids.contains(g)),
            GenreMatch::Any => params.genres.iter().any(|g| m.genre_ids.contains(g)),
        };
        Ok(page(self.movies.iter().filter(|m| matches(m)).cloned().collect()))
    }

    async fn search_people(&self, query: &str, _page: u32) -> AppResult<Page<PersonSummary>> {
        let keanu = PersonSummary {
            id: 6384,
            name: "Keanu Reeves".to_string(),
            profile_url: None,
            known_for_department: Some("Acting".to_string()),
        };
        let found = if keanu.name.to_lowercase().contains(&query.to_lowercase()) {
            vec![keanu]
        } else {
            vec![]
        };
        Ok(page(found))
    }

    async fn search_multi(&self, query: &str, page_no: u32) -> AppResult<Page<MultiSearchResult>> {
        let movies = self.search_movies(query, None, page_no).await?.results;
        let people = self.search_people(query, page_no).await?.results;
        Ok(page(
            movies
                .into_iter()
                .map(MultiSearchResult::Movie)
                .chain(people.into_iter().map(MultiSearchResult::Person))
                .collect(),
        ))
    }

    async fn movie_details(&self, id: MovieId) -> AppResult<MovieDetails> {
        if id != 603 {
            return Err(AppError::NotFound(format!("Movie {} not found", id)));
        }
        let raw: TmdbMovieDetails = serde_json::from_value(json!({
            "id": 603,
            "title": "The Matrix",
            "release_date": "1999-03-30",
            "runtime": 136,
            "genres": [{"id": 28, "name": "Action"}],
            "credits": {
                "cast": [{"id": 6384, "name": "Keanu Reeves", "character": "Neo"}]
            }
        }))
        .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(MovieDetails::from_tmdb(raw, &ImageBase::new(IMAGE_BASE)))
    }

    async fn movie_genre_ids(&self, id: MovieId) -> AppResult<Vec<u64>> {
        self.movies
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.genre_ids.clone())
            .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", id)))
    }

    async fn tv_details(&self, id: u64) -> AppResult<TvShowDetails> {
        Err(AppError::NotFound(format!("TV show {} not found", id)))
    }

    async fn person_details(&self, id: PersonId) -> AppResult<PersonDetails> {
        Err(AppError::NotFound(format!("Person {} not found", id)))
    }
}

struct Account {
    user_id: String,
    password: String,
    display_name: Option<String>,
}

/// Issues `token-<user id>` tokens for accounts kept in memory
#[derive(Default)]
pub struct FakeIdentity {
    accounts: Mutex<HashMap<String, Account>>,
    unavailable: AtomicBool,
}

impl FakeIdentity {
    fn session(email: &str, account: &Account) -> AuthSession {
        AuthSession {
            id_token: format!("token-{}", account.user_id),
            refresh_token: format!("refresh-{}", account.user_id),
            expires_in: 3600,
            user: AuthUser {
                user_id: account.user_id.clone(),
                email: Some(email.to_string()),
                display_name: account.display_name.clone(),
            },
        }
    }

    /// Makes token verification fail as if the service were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Registers an account that has no display name, as if created elsewhere
    pub fn seed(&self, email: &str, password: &str, user_id: &str) {
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                user_id: user_id.to_string(),
                password: password.to_string(),
                display_name: None,
            },
        );
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AppResult<AuthSession> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }
        let account = Account {
            user_id: format!("uid-{}", accounts.len() + 1),
            password: password.to_string(),
            display_name: Some(display_name.to_string()),
        };
        let session = Self::session(email, &account);
        accounts.insert(email.to_string(), account);
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some(account) if account.password == password => Ok(Self::session(email, account)),
            _ => Err(AppError::Unauthorized("Invalid email or password".to_string())),
        }
    }

    async fn verify(&self, id_token: &str) -> AppResult<AuthUser> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::ExternalApi("Identity service error: 503".to_string()));
        }
        let accounts = self.accounts.lock().unwrap();
        let user_id = id_token.strip_prefix("token-").unwrap_or_default();
        accounts
            .iter()
            .find(|(_, account)| account.user_id == user_id)
            .map(|(email, account)| AuthUser {
                user_id: account.user_id.clone(),
                email: Some(email.clone()),
                display_name: account.display_name.clone(),
            })
            .ok_or_else(|| AppError::Unauthorized("Session is invalid or expired".to_string()))
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub identity: Arc<FakeIdentity>,
}

pub fn create_test_app() -> TestApp {
    let identity = Arc::new(FakeIdentity::default());
    let state = Arc::new(AppState::new(
        Arc::new(FakeCatalog::new()),
        Arc::new(MemoryUserStore::new()),
        identity.clone(),
        20,
    ));
    let app = create_router(state, cors_layer(None).unwrap());
    TestApp {
        server: TestServer::new(app).unwrap(),
        identity,
    }
}
