//! Movie metadata catalog abstraction
//!
//! The service never stores catalog data itself; every listing, search and
//! detail page comes from a `MovieCatalog`. The TMDB implementation is the
//! only production one, the trait exists so the recommendation generator
//! and the routes can be exercised without network access.
use crate::{
    error::AppResult,
    models::{
        details::{CastMember, NO_BIOGRAPHY},
        Genre, MovieDetails, MovieId, MovieSummary, MultiSearchResult, Page, PersonDetails,
        PersonId, PersonSummary, TvShowDetails, TvSummary,
    },
};

pub mod tmdb;

pub use tmdb::TmdbClient;

/// How multiple genre ids are combined in a discover request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenreMatch {
    /// Movie must carry every genre
    All,
    /// Movie must carry at least one genre
    Any,
}

impl GenreMatch {
    fn separator(self) -> &'static str {
        match self {
            GenreMatch::All => ",",
            GenreMatch::Any => "|",
        }
    }
}

/// Parameters of a `/discover/movie` request
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverParams {
    pub genres: Vec<u64>,
    pub genre_match: GenreMatch,
    pub year: Option<i32>,
    pub page: u32,
}

impl Default for DiscoverParams {
    fn default() -> Self {
        Self {
            genres: Vec::new(),
            genre_match: GenreMatch::All,
            year: None,
            page: 1,
        }
    }
}

impl DiscoverParams {
    /// Popularity-sorted discover over movies sharing any of `genres`
    pub fn any_genre(genres: Vec<u64>) -> Self {
        Self {
            genres,
            genre_match: GenreMatch::Any,
            ..Self::default()
        }
    }

    /// Query parameters in a stable order, also used as the cache key
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("sort_by", "popularity.desc".to_string()),
            ("include_adult", "false".to_string()),
            ("page", self.page.max(1).to_string()),
        ];

        if !self.genres.is_empty() {
            let genres = self
                .genres
                .iter()
                .map(|g| g.to_string())
                .collect::<Vec<_>>()
                .join(self.genre_match.separator());
            pairs.push(("with_genres", genres));
        }

        if let Some(year) = self.year {
            pairs.push(("primary_release_year", year.to_string()));
        }

        pairs
    }

    pub fn cache_fragment(&self) -> String {
        self.query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Read-only access to movie, TV and people metadata
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Movies trending this week
    async fn trending_movies(&self) -> AppResult<Page<MovieSummary>>;

    async fn upcoming_movies(&self, page: u32) -> AppResult<Page<MovieSummary>>;

    async fn top_rated_movies(&self, page: u32) -> AppResult<Page<MovieSummary>>;

    async fn popular_movies(&self, page: u32) -> AppResult<Page<MovieSummary>>;

    async fn tv_on_the_air(&self, page: u32) -> AppResult<Page<TvSummary>>;

    async fn movie_genres(&self) -> AppResult<Vec<Genre>>;

    /// Free-text title search, optionally restricted to a release year
    async fn search_movies(
        &self,
        query: &str,
        year: Option<i32>,
        page: u32,
    ) -> AppResult<Page<MovieSummary>>;

    async fn discover_movies(&self, params: &DiscoverParams) -> AppResult<Page<MovieSummary>>;

    async fn search_people(&self, query: &str, page: u32) -> AppResult<Page<PersonSummary>>;

    /// Search across movies, TV shows and people at once
    async fn search_multi(&self, query: &str, page: u32) -> AppResult<Page<MultiSearchResult>>;

    async fn movie_details(&self, id: MovieId) -> AppResult<MovieDetails>;

    /// Genre ids of one movie, without the rest of its details
    async fn movie_genre_ids(&self, id: MovieId) -> AppResult<Vec<u64>>;

    async fn tv_details(&self, id: u64) -> AppResult<TvShowDetails>;

    async fn person_details(&self, id: PersonId) -> AppResult<PersonDetails>;
}

/// Fills each cast member's biography from their person page
///
/// Lookups run one after another and hit the person details cache. A failed
/// lookup leaves the placeholder biography instead of failing the page.
pub async fn attach_cast_biographies(catalog: &dyn MovieCatalog, cast: &mut [CastMember]) {
    for member in cast.iter_mut() {
        let biography = match catalog.person_details(member.id).await {
            Ok(person) => person.biography,
            Err(e) => {
                tracing::warn!(person_id = member.id, error = %e, "Failed to fetch cast biography");
                NO_BIOGRAPHY.to_string()
            }
        };
        member.biography = Some(biography);
    }
}
